use webdeps_common::OutputChunk;

#[derive(Debug, Default)]
pub struct BundleOutput {
  pub chunks: Vec<OutputChunk>,
  pub warnings: Vec<anyhow::Error>,
}
