use std::iter;

use rustc_hash::{FxHashMap, FxHashSet};
use webdeps_utils::indexmap::FxIndexSet;

use webdeps_common::ModuleIdx;

use super::LinkStage;

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
enum Status {
  ToBeExecuted(ModuleIdx),
  WaitForExit(ModuleIdx),
}

impl LinkStage<'_> {
  /// Assigns every module its execution order: depth-first post-order over static imports and requires,
  /// entries in order. The runtime module always runs first.
  pub(crate) fn sort_modules(&mut self) {
    let mut execution_stack = self
      .entry_points
      .iter()
      .rev()
      .map(|entry| Status::ToBeExecuted(entry.id))
      .chain(iter::once(Status::ToBeExecuted(self.runtime.id())))
      .collect::<Vec<_>>();

    let mut executed_ids = FxHashSet::default();
    let mut stack_indexes_of_executing_id = FxHashMap::default();

    let mut next_exec_order = 0;
    let mut circular_dependencies = FxIndexSet::default();
    let mut sorted_modules = Vec::with_capacity(self.module_table.len());

    while let Some(status) = execution_stack.pop() {
      match status {
        Status::ToBeExecuted(id) => {
          if executed_ids.contains(&id) {
            // Try to check if there is a circular dependency
            if let Some(index) = stack_indexes_of_executing_id.get(&id).copied() {
              // Executing
              let cycles = execution_stack[index..]
                .iter()
                .filter_map(|action| match action {
                  // Only modules with `Status::WaitForExit` are on the execution chain
                  Status::ToBeExecuted(_) => None,
                  Status::WaitForExit(id) => Some(*id),
                })
                .chain(iter::once(id))
                .collect::<Box<[_]>>();
              circular_dependencies.insert(cycles);
            }
          } else {
            executed_ids.insert(id);
            execution_stack.push(Status::WaitForExit(id));
            stack_indexes_of_executing_id.insert(id, execution_stack.len() - 1);

            execution_stack.extend(
              self.module_table[id]
                .import_records()
                .filter(|rec| rec.kind.is_static())
                .map(|rec| rec.resolved_module())
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .map(Status::ToBeExecuted),
            );
          }
        }
        Status::WaitForExit(id) => {
          let module = &mut self.module_table[id];
          module.set_exec_order(next_exec_order);
          if !module.is_external() {
            sorted_modules.push(id);
          }
          next_exec_order += 1;
          stack_indexes_of_executing_id.remove(&id);
        }
      }
    }

    for cycle in circular_dependencies {
      let paths = cycle
        .iter()
        .copied()
        .filter_map(|id| self.module_table[id].as_normal())
        .map(|module| module.stable_id.as_str())
        .collect::<Vec<_>>();

      self.warnings.push(anyhow::anyhow!("Circular dependency: {}.", paths.join(" -> ")));
    }

    self.sorted_modules = sorted_modules;
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use arcstr::ArcStr;
  use oxc_index::IndexVec;
  use rustc_hash::FxHashSet;
  use webdeps_common::{
    BundleOptions, EntryPoint, EntryPointKind, ExportsKind, ImportKind, Module, ModuleId,
    ModuleType, NormalModule, RawImportRecord, RuntimeModuleBrief, SymbolRef, SymbolRefDb,
  };
  use webdeps_utils::indexmap::{FxIndexMap, FxIndexSet};

  use super::*;
  use crate::{scan_stage::ScanStageOutput, types::SharedOptions};

  fn module(idx: usize, name: &str, deps: &[usize]) -> Module {
    let idx = ModuleIdx::from_usize(idx);
    let symbol = SymbolRef::from((idx, 0.into()));
    NormalModule {
      idx,
      id: ModuleId::new(ArcStr::from(format!("/{name}.mjs"))),
      stable_id: format!("{name}.mjs"),
      repr_name: name.to_string(),
      package_name: None,
      module_type: ModuleType::Js,
      exports_kind: ExportsKind::Esm,
      source: ArcStr::default(),
      exec_order: u32::MAX,
      is_user_defined_entry: false,
      import_records: deps
        .iter()
        .map(|dep| {
          RawImportRecord::new("./dep".into(), ImportKind::Import, oxc::span::Span::default())
            .into_resolved(ModuleIdx::from_usize(*dep))
        })
        .collect(),
      named_imports: FxIndexMap::default(),
      named_exports: FxIndexMap::default(),
      star_exports: vec![],
      cjs_export_names: FxIndexSet::default(),
      patches: vec![],
      declared_symbols: vec![],
      namespace_ref: symbol,
      wrapper_ref: None,
      reserved_names: FxHashSet::default(),
    }
    .into()
  }

  #[test]
  fn orders_dependencies_first_and_reports_cycles() {
    // 0: runtime, 1: entry -> 2 -> 3 -> 2
    let module_table: IndexVec<ModuleIdx, Module> = vec![
      module(0, "runtime", &[]),
      module(1, "entry", &[2]),
      module(2, "a", &[3]),
      module(3, "b", &[2]),
    ]
    .into();
    let runtime = RuntimeModuleBrief::new(module_table[ModuleIdx::from_usize(0)].as_normal().unwrap());
    let options: SharedOptions = Arc::new(BundleOptions::new("/".into()));
    let mut stage = LinkStage::new(
      ScanStageOutput {
        symbols: SymbolRefDb::default(),
        module_table,
        entry_points: vec![EntryPoint {
          name: Some("entry".into()),
          id: ModuleIdx::from_usize(1),
          kind: EntryPointKind::UserDefined,
        }],
        runtime,
        warnings: vec![],
      },
      &options,
    );
    stage.sort_modules();

    let order = stage.sorted_modules.iter().map(|idx| idx.index()).collect::<Vec<_>>();
    assert_eq!(order, [0, 3, 2, 1]);
    assert_eq!(stage.module_table[ModuleIdx::from_usize(3)].exec_order(), 1);
    assert_eq!(stage.warnings.len(), 1);
    assert_eq!(stage.warnings[0].to_string(), "Circular dependency: a.mjs -> b.mjs -> a.mjs.");
  }
}
