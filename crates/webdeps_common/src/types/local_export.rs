use oxc::span::Span;

use crate::SymbolRef;

#[derive(Debug, Clone)]
pub struct LocalExport {
  pub span: Span,
  pub referenced: SymbolRef,
}
