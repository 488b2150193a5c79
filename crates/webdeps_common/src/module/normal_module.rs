use arcstr::ArcStr;
use oxc_index::IndexVec;
use rustc_hash::FxHashSet;
use webdeps_utils::{
  indexmap::{FxIndexMap, FxIndexSet},
  rstr::Rstr,
};

use crate::{
  ExportsKind, ImportRecordIdx, LocalExport, ModuleId, ModuleIdx, ModuleType, NamedImport, Patch,
  ResolvedImportRecord, SymbolRef,
};

#[derive(Debug)]
pub struct NormalModule {
  pub idx: ModuleIdx,
  pub id: ModuleId,
  /// `./node_modules/pkg/index.mjs` relative to cwd, used wherever the module is shown.
  pub stable_id: String,
  /// A legal identifier derived from the file name, the base of every facade symbol name.
  pub repr_name: String,
  /// The name of the package the file belongs to, when it lives inside `node_modules`.
  pub package_name: Option<Rstr>,
  pub module_type: ModuleType,
  pub exports_kind: ExportsKind,
  /// The text patches are applied to. For JSON this is the CommonJS wrapper around the document.
  pub source: ArcStr,
  pub exec_order: u32,
  pub is_user_defined_entry: bool,
  pub import_records: IndexVec<ImportRecordIdx, ResolvedImportRecord>,
  pub named_imports: FxIndexMap<SymbolRef, NamedImport>,
  pub named_exports: FxIndexMap<Rstr, LocalExport>,
  /// `export * from '...'`
  pub star_exports: Vec<ImportRecordIdx>,
  /// Property names assigned to `exports`/`module.exports` that could be detected statically.
  pub cjs_export_names: FxIndexSet<Rstr>,
  /// Sorted by start position, non-overlapping.
  pub patches: Vec<Patch>,
  /// Top-level symbols declared by the module's own code.
  pub declared_symbols: Vec<SymbolRef>,
  /// For ESM the `<repr>_exports` namespace object, for CommonJS the `import_<repr>` interop object.
  pub namespace_ref: SymbolRef,
  /// `require_<repr>`, the lazy factory of a CommonJS module.
  pub wrapper_ref: Option<SymbolRef>,
  /// Names a top-level symbol must not be renamed to: nested bindings, unresolved globals and the top-level
  /// names of a CommonJS body.
  pub reserved_names: FxHashSet<Rstr>,
}

impl NormalModule {
  pub fn is_commonjs(&self) -> bool {
    matches!(self.exports_kind, ExportsKind::CommonJs)
  }

  pub fn is_virtual(&self) -> bool {
    self.id.is_virtual()
  }

  /// Names of a CommonJS module visible to ESM importers, in a stable order: detected assignments followed by the
  /// names configured for its package.
  pub fn commonjs_export_names<'a>(
    &'a self,
    configured: Option<&'a [Rstr]>,
  ) -> impl Iterator<Item = &'a Rstr> + 'a {
    let mut seen = FxHashSet::default();
    self
      .cjs_export_names
      .iter()
      .chain(configured.unwrap_or_default())
      .filter(move |name| name.as_str() != "default" && seen.insert(name.as_str()))
  }
}
