use itertools::Itertools;
use oxc_index::{index_vec, IndexVec};
use rustc_hash::FxHashSet;
use webdeps_common::{ImportKind, Module, ModuleIdx, Specifier, SymbolRef};
use webdeps_error::InstallError;
use webdeps_utils::{
  concat_string, ecmascript::legitimize_identifier_name, indexmap::FxIndexMap, rstr::Rstr,
};

use super::LinkStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportsState {
  Unresolved,
  Resolving,
  Resolved,
}

impl LinkStage<'_> {
  pub(crate) fn bind_imports_and_exports(&mut self) {
    let mut states = index_vec![ExportsState::Unresolved; self.module_table.len()];
    // Facade symbols are created while binding; walking in execution order keeps their numbering stable.
    let sorted_modules = self.sorted_modules.clone();
    for idx in &sorted_modules {
      self.resolve_exports(*idx, &mut states);
    }
    for idx in &sorted_modules {
      self.mark_imported_namespaces(*idx);
      self.bind_named_imports(*idx);
    }

    let mut visited = FxHashSet::default();
    let entries = self.entry_points.iter().map(|entry| entry.id).collect::<Vec<_>>();
    for entry in entries {
      if visited.insert(entry) {
        self.create_entry_exports(entry);
      }
    }
  }

  /// Own exports first, then names reached through `export *`. `default` is never re-exported by a star and the
  /// first module providing a name wins.
  fn resolve_exports(&mut self, idx: ModuleIdx, states: &mut IndexVec<ModuleIdx, ExportsState>) {
    if states[idx] != ExportsState::Unresolved {
      return;
    }
    states[idx] = ExportsState::Resolving;

    let Some(module) = self.module_table[idx].as_normal().filter(|module| !module.is_commonjs()) else {
      states[idx] = ExportsState::Resolved;
      return;
    };

    let mut resolved_exports = module
      .named_exports
      .iter()
      .map(|(name, export)| (name.clone(), export.referenced))
      .collect::<FxIndexMap<_, _>>();
    let star_targets = module
      .star_exports
      .iter()
      .map(|rec_idx| module.import_records[*rec_idx].resolved_module())
      .collect::<Vec<_>>();

    let mut star_exports_from_commonjs = vec![];
    for target in star_targets {
      self.resolve_exports(target, states);
      match &self.module_table[target] {
        Module::Normal(importee) if !importee.is_commonjs() => {
          let meta = &self.metadata[target];
          for (name, symbol) in &meta.resolved_exports {
            if name.as_str() != "default" && !resolved_exports.contains_key(name) {
              resolved_exports.insert(name.clone(), *symbol);
            }
          }
          star_exports_from_commonjs.extend(meta.star_exports_from_commonjs.iter().copied());
        }
        _ => star_exports_from_commonjs.push(target),
      }
    }

    let meta = &mut self.metadata[idx];
    meta.resolved_exports = resolved_exports;
    meta.star_exports_from_commonjs = star_exports_from_commonjs.into_iter().unique().collect();
    states[idx] = ExportsState::Resolved;
  }

  /// A CommonJS module imported from ESM runs where it is ordered, through its interop object. An ESM module
  /// that is `require`d is handed out as its namespace object.
  fn mark_imported_namespaces(&mut self, idx: ModuleIdx) {
    let Some(module) = self.module_table[idx].as_normal() else {
      return;
    };
    for rec in &module.import_records {
      let target = rec.resolved_module();
      let Some(importee) = self.module_table[target].as_normal() else {
        continue;
      };
      match rec.kind {
        ImportKind::Import if importee.is_commonjs() => self.metadata[target].needs_namespace = true,
        ImportKind::Require if !importee.is_commonjs() => self.metadata[target].needs_namespace = true,
        _ => {}
      }
    }
  }

  fn bind_named_imports(&mut self, idx: ModuleIdx) {
    let Some(module) = self.module_table[idx].as_normal() else {
      return;
    };
    let importer = module.stable_id.clone();
    let named_imports = module
      .named_imports
      .iter()
      .map(|(local, named_import)| {
        let target = module.import_records[named_import.record_id].resolved_module();
        (*local, named_import.imported.clone(), target)
      })
      .collect::<Vec<_>>();

    for (local, imported, target) in named_imports {
      match self.resolve_import(target, &imported) {
        Some(symbol) => self.symbols.link(local, symbol),
        None => self.errors.push(
          InstallError::MissingExport {
            importer: importer.clone(),
            exporter: self.module_table[target].stable_id().to_string(),
            name: imported.to_string(),
          }
          .into(),
        ),
      }
    }
  }

  fn resolve_import(&mut self, target: ModuleIdx, imported: &Specifier) -> Option<SymbolRef> {
    let (namespace_ref, is_commonjs) = match &mut self.module_table[target] {
      Module::External(external) => {
        return Some(match imported {
          Specifier::Star => external.namespace_ref,
          Specifier::Literal(name) => *external.named_imports.entry(name.clone()).or_insert_with(|| {
            self.symbols.create_facade_root_symbol_ref(target, &legitimize_identifier_name(name))
          }),
        });
      }
      Module::Normal(importee) => (importee.namespace_ref, importee.is_commonjs()),
    };

    if is_commonjs {
      self.metadata[target].needs_namespace = true;
      return Some(match imported {
        Specifier::Star => namespace_ref,
        Specifier::Literal(name) => self.commonjs_named_facade(target, name),
      });
    }

    match imported {
      Specifier::Star => {
        self.metadata[target].needs_namespace = true;
        Some(namespace_ref)
      }
      Specifier::Literal(name) => {
        if let Some(symbol) = self.metadata[target].resolved_exports.get(name) {
          return Some(*symbol);
        }
        // Not an ESM export; it may come from a CommonJS module behind an `export *`.
        let fallbacks = &self.metadata[target].star_exports_from_commonjs;
        let fallback = fallbacks
          .iter()
          .copied()
          .find(|fallback| self.is_known_commonjs_export(*fallback, name))
          .or_else(|| fallbacks.first().copied())?;
        self.resolve_import(fallback, imported)
      }
    }
  }

  fn is_known_commonjs_export(&self, idx: ModuleIdx, name: &str) -> bool {
    self.module_table[idx].as_normal().is_some_and(|module| {
      let configured = self.options.configured_named_exports(module.package_name.as_ref());
      module.commonjs_export_names(configured).any(|export| export.as_str() == name)
    })
  }

  /// `var <symbol> = import_<repr>.<name>;`, created once per CommonJS module and name.
  fn commonjs_named_facade(&mut self, target: ModuleIdx, name: &Rstr) -> SymbolRef {
    if let Some(symbol) = self.metadata[target].commonjs_named_facades.get(name) {
      return *symbol;
    }
    let facade_name = if name.as_str() == "default" {
      let repr_name = self.module_table[target].as_normal().map_or("", |module| module.repr_name.as_str());
      concat_string!(repr_name, "_default")
    } else {
      legitimize_identifier_name(name).into_owned()
    };
    let symbol = self.symbols.create_facade_root_symbol_ref(target, &facade_name);
    self.metadata[target].commonjs_named_facades.insert(name.clone(), symbol);
    symbol
  }

  /// What the chunk of an entry exports. CommonJS entries export `default` (their `module.exports`) plus every
  /// name that was detected or configured for their package.
  fn create_entry_exports(&mut self, entry: ModuleIdx) {
    let options = self.options;
    let Some(module) = self.module_table[entry].as_normal() else {
      return;
    };

    if module.is_commonjs() {
      let configured = options.configured_named_exports(module.package_name.as_ref());
      let names = module.commonjs_export_names(configured).cloned().collect::<Vec<_>>();
      self.metadata[entry].needs_namespace = true;
      let default = Rstr::new("default");
      let entry_exports = std::iter::once(default)
        .chain(names)
        .map(|name| {
          let symbol = self.commonjs_named_facade(entry, &name);
          (name, symbol)
        })
        .collect();
      self.metadata[entry].entry_exports = entry_exports;
      return;
    }

    let mut entry_exports = self.metadata[entry]
      .resolved_exports
      .iter()
      .map(|(name, symbol)| (name.clone(), *symbol))
      .collect::<Vec<_>>();
    let mut exported = entry_exports.iter().map(|(name, _)| name.clone()).collect::<FxHashSet<_>>();

    for fallback in self.metadata[entry].star_exports_from_commonjs.clone() {
      let Some(importee) = self.module_table[fallback].as_normal() else {
        // The names of an external module are unknown until runtime.
        continue;
      };
      let configured = options.configured_named_exports(importee.package_name.as_ref());
      let names = importee
        .commonjs_export_names(configured)
        .filter(|name| !exported.contains(*name))
        .cloned()
        .collect::<Vec<_>>();
      self.metadata[fallback].needs_namespace = true;
      for name in names {
        let symbol = self.commonjs_named_facade(fallback, &name);
        exported.insert(name.clone());
        entry_exports.push((name, symbol));
      }
    }

    self.metadata[entry].entry_exports = entry_exports;
  }
}
