use webdeps_common::{Module, ModuleIdx, Patch, SymbolRef};
use webdeps_utils::indexmap::FxIndexSet;

use super::LinkStage;

impl LinkStage<'_> {
  /// Records which top-level symbols every module declares and refers to once rendered, including the runtime
  /// helpers and the interop objects its rendering needs. A module using a helper depends on the runtime module.
  pub(crate) fn reference_needed_symbols(&mut self) {
    let runtime_idx = self.runtime.id();
    for idx in self.sorted_modules.clone() {
      let (declared_symbols, referenced_symbols, uses_runtime) = self.needed_symbols_of(idx);
      let meta = &mut self.metadata[idx];
      meta.declared_symbols = declared_symbols;
      meta.referenced_symbols = referenced_symbols;
      if uses_runtime && idx != runtime_idx {
        meta.dependencies.insert(runtime_idx);
      }
    }
  }

  fn needed_symbols_of(&self, idx: ModuleIdx) -> (Vec<SymbolRef>, FxIndexSet<SymbolRef>, bool) {
    let Some(module) = self.module_table[idx].as_normal() else {
      return (vec![], FxIndexSet::default(), false);
    };
    let meta = &self.metadata[idx];
    let mut declared = vec![];
    let mut referenced = FxIndexSet::default();
    let mut helpers: Vec<&str> = vec![];

    for patch in &module.patches {
      match patch {
        Patch::SymbolRef { symbol, .. }
        | Patch::DeclareDefault { symbol, .. }
        | Patch::InsertName { symbol, .. } => {
          referenced.insert(*symbol);
        }
        Patch::Require { record, .. } => {
          match &self.module_table[module.import_records[*record].resolved_module()] {
            Module::Normal(importee) => match importee.wrapper_ref {
              Some(wrapper_ref) => {
                referenced.insert(wrapper_ref);
              }
              None => {
                referenced.insert(importee.namespace_ref);
                helpers.push("__toCommonJS");
              }
            },
            Module::External(importee) => {
              referenced.insert(importee.namespace_ref);
            }
          }
        }
        Patch::Remove(_) | Patch::Replace { .. } | Patch::DynamicImport { .. } => {}
      }
    }

    if let Some(wrapper_ref) = module.wrapper_ref {
      declared.push(wrapper_ref);
      helpers.push("__commonJS");
      if meta.needs_namespace {
        declared.push(module.namespace_ref);
        declared.extend(meta.commonjs_named_facades.values().copied());
        helpers.push("__toESM");
      }
    } else {
      declared.extend(module.declared_symbols.iter().copied());
      if meta.needs_namespace {
        declared.push(module.namespace_ref);
        referenced.extend(meta.resolved_exports.values().copied());
        helpers.push("__export");
      }
    }

    let uses_runtime = !helpers.is_empty();
    referenced.extend(helpers.into_iter().map(|name| self.runtime.resolve_symbol(name)));

    (declared, referenced, uses_runtime)
  }
}
