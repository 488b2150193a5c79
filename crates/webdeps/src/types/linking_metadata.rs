use oxc_index::IndexVec;
use webdeps_common::{ModuleIdx, SymbolRef};
use webdeps_utils::{
  indexmap::{FxIndexMap, FxIndexSet},
  rstr::Rstr,
};

/// Metadata generated for a module during the linking phase.
#[derive(Debug, Default)]
pub struct LinkingMetadata {
  /// The modules that must run before this one: static imports and requires, plus the runtime module when a
  /// helper is used. If this module is included, all modules in this set are included too.
  pub dependencies: FxIndexSet<ModuleIdx>,

  /// Export name to the symbol it resolves to, including names reached through `export *`. ESM only.
  pub resolved_exports: FxIndexMap<Rstr, SymbolRef>,

  /// CommonJS modules reached through `export *`. Names that no ESM module exports are looked up on them.
  pub star_exports_from_commonjs: Vec<ModuleIdx>,

  /// ESM: the `<repr>_exports` object is rendered. CommonJS: the `import_<repr>` interop object is rendered.
  pub needs_namespace: bool,

  /// `var <symbol> = import_<repr>.<name>;`, one per name imported from a CommonJS module.
  pub commonjs_named_facades: FxIndexMap<Rstr, SymbolRef>,

  /// What an entry chunk of this module exports.
  pub entry_exports: Vec<(Rstr, SymbolRef)>,

  /// Top-level symbols the rendered module declares.
  pub declared_symbols: Vec<SymbolRef>,

  /// Symbols the rendered module refers to, not canonicalized.
  pub referenced_symbols: FxIndexSet<SymbolRef>,
}

pub type LinkingMetadataVec = IndexVec<ModuleIdx, LinkingMetadata>;
