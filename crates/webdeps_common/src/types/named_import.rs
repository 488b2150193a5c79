use oxc::span::Span;
use webdeps_utils::rstr::Rstr;

use crate::ImportRecordIdx;

/// One imported binding: `foo` in `import { foo } from './lib'`, or the facade symbol created for
/// `export { foo as bar } from './lib'`.
#[derive(Debug, Clone)]
pub struct NamedImport {
  pub imported: Specifier,
  pub span: Span,
  pub record_id: ImportRecordIdx,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Specifier {
  Star,
  Literal(Rstr),
}

impl std::fmt::Display for Specifier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Star => f.write_str("*"),
      Self::Literal(name) => f.write_str(name),
    }
  }
}
