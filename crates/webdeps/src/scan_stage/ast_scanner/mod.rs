mod impl_visit;

use oxc::{
  ast::ast::{Expression, IdentifierReference, Program, StaticMemberExpression},
  ast::Visit,
  semantic::{ScopeTree, SymbolId, SymbolTable},
  span::Span,
};
use oxc_index::IndexVec;
use rustc_hash::{FxHashMap, FxHashSet};
use webdeps_common::{
  BundleOptions, ExportsKind, ImportKind, ImportRecordIdx, ImportRecordMeta, LocalExport,
  ModuleIdx, NamedImport, Patch, RawImportRecord, Specifier, SymbolRef, SymbolRefDbForModule,
};
use webdeps_utils::{
  concat_string,
  ecmascript::to_string_literal,
  indexmap::{FxIndexMap, FxIndexSet},
  rstr::{Rstr, ToRstr},
};

use crate::polyfills::PROCESS_POLYFILL_ID;

/// What the file itself says about its format, before looking at its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHint {
  /// `.mjs` and the runtime module.
  Esm,
  /// `.cjs`, JSON documents, empty modules and the polyfills.
  CommonJs,
  Unknown,
}

#[derive(Debug)]
pub struct AstScanResult {
  pub symbols: SymbolRefDbForModule,
  pub exports_kind: ExportsKind,
  pub named_imports: FxIndexMap<SymbolRef, NamedImport>,
  pub named_exports: FxIndexMap<Rstr, LocalExport>,
  pub import_records: IndexVec<ImportRecordIdx, RawImportRecord>,
  pub star_exports: Vec<ImportRecordIdx>,
  pub cjs_export_names: FxIndexSet<Rstr>,
  pub patches: Vec<Patch>,
  pub declared_symbols: Vec<SymbolRef>,
  pub namespace_ref: SymbolRef,
  pub wrapper_ref: Option<SymbolRef>,
  pub reserved_names: FxHashSet<Rstr>,
  pub warnings: Vec<anyhow::Error>,
}

/// Collects everything the linker needs from one module in a single pass: import records, imported and exported
/// bindings, and the text patches that turn the module body into a piece of a chunk.
pub struct AstScanner<'me> {
  idx: ModuleIdx,
  stable_id: &'me str,
  repr_name: &'me str,
  options: &'me BundleOptions,
  symbol_table: &'me SymbolTable,
  scopes: &'me ScopeTree,
  symbols: SymbolRefDbForModule,
  root_symbols: FxHashMap<SymbolId, SymbolRef>,
  root_names: FxHashMap<&'me str, SymbolRef>,
  root_binding_count: usize,
  named_imports: FxIndexMap<SymbolRef, NamedImport>,
  named_exports: FxIndexMap<Rstr, LocalExport>,
  import_records: IndexVec<ImportRecordIdx, RawImportRecord>,
  star_exports: Vec<ImportRecordIdx>,
  cjs_export_names: FxIndexSet<Rstr>,
  patches: Vec<Patch>,
  default_export_ref: Option<SymbolRef>,
  process_shim_ref: Option<SymbolRef>,
  has_module_syntax: bool,
  in_shorthand: bool,
  in_assignment_target: bool,
  warnings: Vec<anyhow::Error>,
}

impl<'me> AstScanner<'me> {
  pub fn new(
    idx: ModuleIdx,
    symbol_table: &'me SymbolTable,
    scopes: &'me ScopeTree,
    stable_id: &'me str,
    repr_name: &'me str,
    options: &'me BundleOptions,
  ) -> Self {
    let mut symbols = SymbolRefDbForModule::new(idx);

    // Declaration order keeps symbol numbering independent of hashing.
    let mut root_bindings = scopes
      .get_bindings(scopes.root_scope_id())
      .iter()
      .map(|(name, symbol_id)| (*name, *symbol_id))
      .collect::<Vec<_>>();
    root_bindings.sort_by_key(|(_, symbol_id)| symbol_table.get_span(*symbol_id).start);

    let mut root_symbols = FxHashMap::default();
    let mut root_names = FxHashMap::default();
    for (name, symbol_id) in root_bindings {
      let symbol_ref = symbols.create_root_symbol_ref(name);
      root_symbols.insert(symbol_id, symbol_ref);
      root_names.insert(name, symbol_ref);
    }
    let root_binding_count = symbols.len();

    Self {
      idx,
      stable_id,
      repr_name,
      options,
      symbol_table,
      scopes,
      symbols,
      root_symbols,
      root_names,
      root_binding_count,
      named_imports: FxIndexMap::default(),
      named_exports: FxIndexMap::default(),
      import_records: IndexVec::new(),
      star_exports: Vec::new(),
      cjs_export_names: FxIndexSet::default(),
      patches: Vec::new(),
      default_export_ref: None,
      process_shim_ref: None,
      has_module_syntax: false,
      in_shorthand: false,
      in_assignment_target: false,
      warnings: Vec::new(),
    }
  }

  pub fn scan(mut self, program: &Program<'_>, hint: FormatHint) -> AstScanResult {
    self.visit_program(program);

    let exports_kind = self.determine_exports_kind(program.source_type.is_module(), hint);

    let mut reserved_names = self
      .symbol_table
      .symbol_ids()
      .filter(|symbol_id| self.symbol_table.get_scope_id(*symbol_id) != self.scopes.root_scope_id())
      .map(|symbol_id| self.symbol_table.get_name(symbol_id).to_rstr())
      .collect::<FxHashSet<_>>();
    reserved_names.extend(
      self
        .scopes
        .root_unresolved_references()
        .keys()
        .filter(|name| !(self.options.shim_builtins && **name == "process"))
        .map(|name| name.to_rstr()),
    );

    let root_binding_count = self.root_binding_count;
    let (declared_symbols, namespace_ref, wrapper_ref) = match exports_kind {
      ExportsKind::Esm => {
        let mut declared_symbols = (0..root_binding_count)
          .map(|index| SymbolRef::from((self.idx, index.into())))
          .filter(|symbol| !self.named_imports.contains_key(symbol))
          .collect::<Vec<_>>();
        declared_symbols.extend(self.default_export_ref);
        let namespace_ref = self
          .symbols
          .create_facade_root_symbol_ref(&concat_string!(self.repr_name, "_exports"));
        (declared_symbols, namespace_ref, None)
      }
      ExportsKind::CommonJs => {
        // The body runs inside a function; its top-level names keep their spelling.
        self.patches.retain(|patch| {
          !matches!(patch, Patch::SymbolRef { symbol, .. } if symbol.symbol.index() < root_binding_count)
        });
        reserved_names.extend(self.root_names.keys().map(|name| name.to_rstr()));
        let wrapper_ref = self
          .symbols
          .create_facade_root_symbol_ref(&concat_string!("require_", self.repr_name));
        let namespace_ref =
          self.symbols.create_facade_root_symbol_ref(&concat_string!("import_", self.repr_name));
        (vec![], namespace_ref, Some(wrapper_ref))
      }
    };

    self.patches.sort_by_key(|patch| (patch.start(), patch.end()));

    AstScanResult {
      symbols: self.symbols,
      exports_kind,
      named_imports: self.named_imports,
      named_exports: self.named_exports,
      import_records: self.import_records,
      star_exports: self.star_exports,
      cjs_export_names: self.cjs_export_names,
      patches: self.patches,
      declared_symbols,
      namespace_ref,
      wrapper_ref,
      reserved_names,
      warnings: self.warnings,
    }
  }

  fn determine_exports_kind(&self, parsed_as_module: bool, hint: FormatHint) -> ExportsKind {
    if self.has_module_syntax {
      return ExportsKind::Esm;
    }
    match hint {
      FormatHint::Esm => ExportsKind::Esm,
      FormatHint::CommonJs => ExportsKind::CommonJs,
      FormatHint::Unknown => {
        let has_commonjs_globals = self
          .scopes
          .root_unresolved_references()
          .keys()
          .any(|name| matches!(*name, "require" | "module" | "exports"));
        if has_commonjs_globals || !parsed_as_module {
          ExportsKind::CommonJs
        } else {
          ExportsKind::Esm
        }
      }
    }
  }

  fn add_import_record(
    &mut self,
    specifier: &str,
    kind: ImportKind,
    span: Span,
    meta: ImportRecordMeta,
  ) -> ImportRecordIdx {
    self.import_records.push(RawImportRecord::new(Rstr::new(specifier), kind, span).with_meta(meta))
  }

  fn add_named_import(&mut self, local: SymbolRef, imported: Specifier, span: Span, record_id: ImportRecordIdx) {
    self.named_imports.insert(local, NamedImport { imported, span, record_id });
  }

  fn add_local_export(&mut self, exported: &str, referenced: SymbolRef, span: Span) {
    self.named_exports.insert(exported.to_rstr(), LocalExport { span, referenced });
  }

  fn root_symbol_of(&self, symbol_id: Option<SymbolId>) -> Option<SymbolRef> {
    symbol_id.and_then(|symbol_id| self.root_symbols.get(&symbol_id).copied())
  }

  fn root_symbol_named(&self, name: &str) -> Option<SymbolRef> {
    self.root_names.get(name).copied()
  }

  fn create_default_export_ref(&mut self) -> SymbolRef {
    let symbol = self.symbols.create_facade_root_symbol_ref(&concat_string!(self.repr_name, "_default"));
    self.default_export_ref = Some(symbol);
    symbol
  }

  fn is_unresolved(&self, ident: &IdentifierReference) -> bool {
    ident
      .reference_id
      .get()
      .is_some_and(|reference_id| self.symbol_table.get_reference(reference_id).symbol_id().is_none())
  }

  fn is_unresolved_named(&self, expr: &Expression, name: &str) -> bool {
    matches!(expr, Expression::Identifier(ident) if ident.name == name && self.is_unresolved(ident))
  }

  /// `module.exports`
  fn is_module_exports(&self, member: &StaticMemberExpression) -> bool {
    member.property.name == "exports" && self.is_unresolved_named(&member.object, "module")
  }

  /// `exports` or `module.exports`
  fn is_exports_object(&self, expr: &Expression) -> bool {
    match expr {
      Expression::StaticMemberExpression(member) => self.is_module_exports(member),
      _ => self.is_unresolved_named(expr, "exports"),
    }
  }

  fn add_cjs_export_name(&mut self, name: &str) {
    if name != "__esModule" {
      self.cjs_export_names.insert(name.to_rstr());
    }
  }

  /// The local standing in for the `process` global, imported from the polyfill on first use.
  fn process_shim_ref(&mut self) -> SymbolRef {
    if let Some(symbol) = self.process_shim_ref {
      return symbol;
    }
    let symbol = self.symbols.create_facade_root_symbol_ref("process");
    let record = self.add_import_record(
      PROCESS_POLYFILL_ID,
      ImportKind::Import,
      Span::default(),
      ImportRecordMeta::IS_SHIM_IMPORT,
    );
    self.add_named_import(symbol, Specifier::Literal(Rstr::new("default")), Span::default(), record);
    self.process_shim_ref = Some(symbol);
    symbol
  }

  fn shim_global(&mut self, ident: &IdentifierReference) {
    let replacement = match ident.name.as_str() {
      "process" => {
        let symbol = self.process_shim_ref();
        self.patches.push(Patch::SymbolRef { span: ident.span, symbol, shorthand: self.in_shorthand });
        return;
      }
      "global" => "globalThis".to_string(),
      "__filename" => to_string_literal(&concat_string!("/", self.stable_id)),
      "__dirname" => {
        let dirname = self.stable_id.rsplit_once('/').map_or("", |(dir, _)| dir);
        to_string_literal(&concat_string!("/", dirname))
      }
      _ => return,
    };
    let text = if self.in_shorthand {
      concat_string!(ident.name, ": ", replacement)
    } else {
      replacement
    };
    self.patches.push(Patch::Replace { span: ident.span, text: text.into() });
  }
}
