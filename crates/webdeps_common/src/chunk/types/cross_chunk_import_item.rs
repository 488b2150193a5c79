use webdeps_utils::rstr::Rstr;

use crate::SymbolRef;

#[derive(Debug, Clone)]
pub struct CrossChunkImportItem {
  /// The name the importee chunk exports the symbol as.
  pub export_alias: Rstr,
  pub import_ref: SymbolRef,
}
