use oxc_sourcemap::{SourceMap, SourceMapBuilder};

use crate::{line_index::to_u32, LineIndex};

/// Accumulates rendered chunk code and, optionally, a line-level source map for it.
///
/// Text copied from an original source is pushed with [`MappedWriter::push_mapped`], which records a mapping at
/// the start of the copied text and at the start of every line inside it. Everything else is pushed with
/// [`MappedWriter::push_str`] and stays unmapped.
pub struct MappedWriter {
  code: String,
  builder: Option<SourceMapBuilder>,
  line: u32,
  col: u32,
}

impl MappedWriter {
  pub fn new(source_map: bool) -> Self {
    Self { code: String::new(), builder: source_map.then(SourceMapBuilder::default), line: 0, col: 0 }
  }

  /// Registers an original source. Returns `None` when source maps are disabled.
  pub fn add_source(&mut self, name: &str, content: &str) -> Option<u32> {
    self.builder.as_mut().map(|builder| builder.add_source_and_content(name, content))
  }

  pub fn push_str(&mut self, text: &str) {
    self.advance(text);
    self.code.push_str(text);
  }

  /// `text` must be the verbatim slice of `source` starting at byte `offset`.
  pub fn push_mapped(
    &mut self,
    text: &str,
    source_id: Option<u32>,
    source: &str,
    index: &LineIndex,
    offset: usize,
  ) {
    if source_id.is_none() || self.builder.is_none() {
      self.push_str(text);
      return;
    }

    let mut segment_start = 0;
    for line in text.split_inclusive('\n') {
      if let (Some(builder), false) = (self.builder.as_mut(), line.trim().is_empty()) {
        let (src_line, src_col) = index.line_col(source, offset + segment_start);
        builder.add_token(self.line, self.col, src_line, src_col, source_id, None);
      }
      segment_start += line.len();
      if line.ends_with('\n') {
        self.line += 1;
        self.col = 0;
      } else {
        self.col += to_u32(line.encode_utf16().count());
      }
    }
    self.code.push_str(text);
  }

  pub fn is_empty(&self) -> bool {
    self.code.is_empty()
  }

  pub fn finish(self) -> (String, Option<SourceMap>) {
    (self.code, self.builder.map(SourceMapBuilder::into_sourcemap))
  }

  fn advance(&mut self, text: &str) {
    match text.rfind('\n') {
      Some(last_newline) => {
        self.line += crate::lines_count(text);
        self.col = to_u32(text[last_newline + 1..].encode_utf16().count());
      }
      None => self.col += to_u32(text.encode_utf16().count()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn maps_copied_lines() {
    let source = "const a = 1;\nconst b = 2;\n";
    let index = LineIndex::new(source);
    let mut writer = MappedWriter::new(true);
    let id = writer.add_source("node_modules/pkg/index.mjs", source);
    writer.push_str("//#region pkg\n");
    writer.push_mapped(&source[13..], id, source, &index, 13);
    writer.push_str("//#endregion\n");

    let (code, map) = writer.finish();
    assert_eq!(code, "//#region pkg\nconst b = 2;\n//#endregion\n");
    let map = map.unwrap();
    let tokens = map.get_tokens().collect::<Vec<_>>();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].get_dst_line(), 1);
    assert_eq!(tokens[0].get_src_line(), 1);
  }

  #[test]
  fn disabled_maps_only_copy_text() {
    let mut writer = MappedWriter::new(false);
    assert_eq!(writer.add_source("a.js", "x"), None);
    writer.push_mapped("x", None, "x", &LineIndex::new("x"), 0);
    let (code, map) = writer.finish();
    assert_eq!(code, "x");
    assert!(map.is_none());
  }
}
