use arcstr::ArcStr;
use webdeps_utils::rstr::Rstr;

/// A finalized chunk: its hashed filename relative to the output root, its code and its source map.
#[derive(Debug, Clone)]
pub struct OutputChunk {
  pub name: ArcStr,
  pub filename: String,
  pub code: String,
  pub map: Option<String>,
  pub is_entry: bool,
  pub exports: Vec<Rstr>,
  /// Stable ids of the modules rendered into this chunk.
  pub modules: Vec<String>,
  /// Filenames of the chunks this chunk imports.
  pub imports: Vec<String>,
}

impl OutputChunk {
  pub fn map_filename(&self) -> String {
    format!("{}.map", self.filename)
  }
}
