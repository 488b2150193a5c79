use oxc::span::Span;
use webdeps_utils::rstr::Rstr;

use crate::{ImportRecordIdx, SymbolRef};

/// A text edit applied to the original source while rendering a module. Modules are never reprinted from the
/// AST; everything the linker changes is expressed as one of these.
#[derive(Debug, Clone)]
pub enum Patch {
  /// Import statements, the `export` keyword and export lists.
  Remove(Span),
  Replace { span: Span, text: Rstr },
  /// A binding or reference of a top-level symbol. Rendered as the symbol's name in the chunk.
  /// `shorthand` marks `{ foo }` so the key survives renaming: `{ foo: foo$1 }`.
  SymbolRef { span: Span, symbol: SymbolRef, shorthand: bool },
  /// `export default ` in front of an expression becomes `var <symbol> = `.
  DeclareDefault { span: Span, symbol: SymbolRef },
  /// Gives an anonymous `export default function () {}` or class a name.
  InsertName { at: u32, symbol: SymbolRef },
  /// A whole `require('x')` call.
  Require { span: Span, record: ImportRecordIdx },
  /// The string literal argument of `import('x')`.
  DynamicImport { span: Span, record: ImportRecordIdx },
}

impl Patch {
  pub fn start(&self) -> u32 {
    match self {
      Self::Remove(span)
      | Self::Replace { span, .. }
      | Self::SymbolRef { span, .. }
      | Self::DeclareDefault { span, .. }
      | Self::Require { span, .. }
      | Self::DynamicImport { span, .. } => span.start,
      Self::InsertName { at, .. } => *at,
    }
  }

  pub fn end(&self) -> u32 {
    match self {
      Self::Remove(span)
      | Self::Replace { span, .. }
      | Self::SymbolRef { span, .. }
      | Self::DeclareDefault { span, .. }
      | Self::Require { span, .. }
      | Self::DynamicImport { span, .. } => span.end,
      Self::InsertName { at, .. } => *at,
    }
  }
}
