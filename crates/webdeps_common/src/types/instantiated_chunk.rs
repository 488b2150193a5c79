use webdeps_sourcemap::SourceMap;

use crate::{ChunkIdx, PreliminaryFilename};

/// A rendered chunk whose filename and content may still contain hash placeholders.
#[derive(Debug)]
pub struct InstantiatedChunk {
  pub originate_from: ChunkIdx,
  pub content: String,
  pub map: Option<SourceMap>,
  pub preliminary_filename: PreliminaryFilename,
}
