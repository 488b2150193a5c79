mod code_splitting;
mod compute_cross_chunk_links;
mod generate_chunk_name_and_preliminary_filenames;
mod render_chunk;

use webdeps_utils::rayon::{IntoParallelRefMutIterator, ParallelIterator};

use crate::{
  types::{bundle_output::BundleOutput, SharedOptions},
  utils::chunk::{
    deconflict_chunk_symbols::deconflict_chunk_symbols, finalize_chunks::finalize_chunks,
  },
};

use super::link_stage::LinkStageOutput;

pub struct GenerateStage<'a> {
  link_output: &'a mut LinkStageOutput,
  options: &'a SharedOptions,
}

impl<'a> GenerateStage<'a> {
  pub fn new(link_output: &'a mut LinkStageOutput, options: &'a SharedOptions) -> Self {
    Self { link_output, options }
  }

  #[tracing::instrument(level = "debug", skip_all)]
  pub fn generate(&mut self) -> BundleOutput {
    let mut chunk_graph = self.generate_chunks();
    self.compute_cross_chunk_links(&mut chunk_graph);
    self.generate_chunk_name_and_preliminary_filenames(&mut chunk_graph);

    let link_output = &*self.link_output;
    chunk_graph.chunk_table.par_iter_mut().for_each(|chunk| {
      deconflict_chunk_symbols(chunk, link_output);
    });
    Self::assign_cross_chunk_export_aliases(&mut chunk_graph);

    let instantiated_chunks = self.render_chunks(&chunk_graph);
    let chunks = finalize_chunks(instantiated_chunks, &chunk_graph, self.link_output);
    tracing::debug!("generated {} chunks", chunks.len());

    BundleOutput { chunks, warnings: std::mem::take(&mut self.link_output.warnings) }
  }
}
