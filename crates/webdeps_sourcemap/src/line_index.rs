use memchr::memchr_iter;

/// Maps byte offsets of a source text to zero-based `(line, utf16 column)` pairs.
#[derive(Debug)]
pub struct LineIndex {
  line_starts: Vec<usize>,
}

impl LineIndex {
  pub fn new(source: &str) -> Self {
    let mut line_starts = vec![0];
    line_starts.extend(memchr_iter(b'\n', source.as_bytes()).map(|idx| idx + 1));
    Self { line_starts }
  }

  pub fn line_col(&self, source: &str, offset: usize) -> (u32, u32) {
    let line = self.line_starts.partition_point(|start| *start <= offset).saturating_sub(1);
    let line_start = self.line_starts[line];
    let col = source.get(line_start..offset).map_or(0, |prefix| prefix.encode_utf16().count());
    (to_u32(line), to_u32(col))
  }
}

#[inline]
pub(crate) fn to_u32(value: usize) -> u32 {
  u32::try_from(value).unwrap_or(u32::MAX)
}

#[test]
fn test_line_col() {
  let source = "ab\n€c\n\nd";
  let index = LineIndex::new(source);
  assert_eq!(index.line_col(source, 0), (0, 0));
  assert_eq!(index.line_col(source, 2), (0, 2));
  assert_eq!(index.line_col(source, 3), (1, 0));
  // `€` is three bytes long but a single utf16 unit
  assert_eq!(index.line_col(source, 6), (1, 1));
  assert_eq!(index.line_col(source, 8), (2, 0));
  assert_eq!(index.line_col(source, 9), (3, 0));
}
