use std::{collections::hash_map::Entry, sync::Arc};

use arcstr::ArcStr;
use oxc_index::IndexVec;
use rustc_hash::{FxHashMap, FxHashSet};
use tokio::sync::mpsc::Receiver;
use webdeps_common::{
  EntryPoint, EntryPointKind, ExternalModule, ImportKind, ImportRecordIdx, Module, ModuleId,
  ModuleIdx, ModuleLoaderMsg, NormalModuleTaskResult, ResolvedId, RuntimeModuleBrief, SymbolRefDb,
  RUNTIME_MODULE_ID,
};
use webdeps_error::BuildResult;
use webdeps_fs::OsFileSystem;
use webdeps_utils::{ecmascript::legitimize_identifier_name, indexmap::FxIndexSet, rstr::Rstr};

use super::{
  module_task::{ModuleTask, ModuleTaskOwner},
  task_context::TaskContext,
};
use crate::types::{IndexModules, SharedOptions, SharedResolver};

pub struct ModuleLoader {
  rx: Receiver<ModuleLoaderMsg>,
  remaining: u32,
  shared_context: Arc<TaskContext>,
  runtime_idx: ModuleIdx,
  symbols: SymbolRefDb,
  modules: IndexVec<ModuleIdx, Option<Module>>,
  visited: FxHashMap<ArcStr, ModuleIdx>,
}

#[derive(Debug)]
pub struct ModuleLoaderOutput {
  pub symbols: SymbolRefDb,
  pub module_table: IndexModules,
  // Package entries followed by dynamic import entries
  pub entry_points: Vec<EntryPoint>,
  pub runtime: RuntimeModuleBrief,
  pub warnings: Vec<anyhow::Error>,
}

impl ModuleLoader {
  pub fn new(fs: OsFileSystem, options: SharedOptions, resolver: SharedResolver) -> Self {
    // 1024 should be enough for most cases
    // over 1024 pending tasks are insane
    let (tx, rx) = tokio::sync::mpsc::channel(1024);

    let shared_context = Arc::new(TaskContext { fs, resolver, options, tx });

    let mut modules = IndexVec::new();
    let runtime_idx = modules.push(None);
    let visited = FxHashMap::from_iter([(RUNTIME_MODULE_ID.into(), runtime_idx)]);

    let task = ModuleTask::new(
      Arc::clone(&shared_context),
      runtime_idx,
      None,
      ResolvedId::new(RUNTIME_MODULE_ID),
      false,
    );
    tokio::spawn(task.run());

    Self {
      rx,
      remaining: 1,
      shared_context,
      runtime_idx,
      symbols: SymbolRefDb::default(),
      modules,
      visited,
    }
  }

  /// `user_defined_entries` are `(name, resolved entry, owner)` triples, one per package.
  pub async fn fetch_all_modules(
    mut self,
    user_defined_entries: Vec<(ArcStr, ResolvedId, ModuleTaskOwner)>,
  ) -> BuildResult<ModuleLoaderOutput> {
    let mut user_defined_entry_ids = FxHashSet::default();

    let mut entry_points = user_defined_entries
      .into_iter()
      .map(|(name, resolved_id, owner)| {
        let id = self.try_spawn_new_task(resolved_id, Some(owner), true);
        user_defined_entry_ids.insert(id);
        EntryPoint { name: Some(name), id, kind: EntryPointKind::UserDefined }
      })
      .collect::<Vec<_>>();

    let mut errors: Vec<anyhow::Error> = vec![];
    let mut warnings: Vec<anyhow::Error> = vec![];
    let mut runtime: Option<RuntimeModuleBrief> = None;
    let mut dynamic_import_entry_ids = FxIndexSet::default();

    while self.remaining > 0 {
      let Some(msg) = self.rx.recv().await else {
        break;
      };

      match msg {
        ModuleLoaderMsg::NormalModuleDone(task_result) => {
          let NormalModuleTaskResult {
            mut module,
            symbols,
            resolved_deps,
            raw_import_records,
            warnings: task_result_warnings,
          } = *task_result;

          warnings.extend(task_result_warnings);

          let importer_id = Rstr::new(&module.stable_id);
          module.import_records = raw_import_records
            .into_iter()
            .zip(resolved_deps)
            .map(|(raw_rec, resolved_id)| {
              let owner = ModuleTaskOwner::new(importer_id.clone(), raw_rec.specifier.clone());
              let id = self.try_spawn_new_task(resolved_id, Some(owner), false);
              // Dynamic imported module will be considered as an entry
              if matches!(raw_rec.kind, ImportKind::DynamicImport)
                && !user_defined_entry_ids.contains(&id)
              {
                dynamic_import_entry_ids.insert(id);
              }
              raw_rec.into_resolved(id)
            })
            .collect::<IndexVec<ImportRecordIdx, _>>();

          let module_idx = module.idx;
          if module_idx == self.runtime_idx {
            runtime = Some(RuntimeModuleBrief::new(&module));
          }
          self.symbols.store_local_db(module_idx, symbols);
          self.modules[module_idx] = Some(module.into());
          self.remaining -= 1;
        }
        ModuleLoaderMsg::BuildErrors(e) => {
          errors.extend(e);
          self.remaining -= 1;
        }
      }
    }

    if !errors.is_empty() {
      errors.sort_by_cached_key(ToString::to_string);
      Err(errors)?;
    }

    let module_table: IndexModules = self
      .modules
      .into_iter_enumerated()
      .map(|(idx, module)| {
        module.ok_or_else(|| anyhow::anyhow!("module #{} was never loaded", idx.index()))
      })
      .collect::<anyhow::Result<_>>()?;

    let mut dynamic_import_entry_ids = dynamic_import_entry_ids.into_iter().collect::<Vec<_>>();
    dynamic_import_entry_ids.sort_unstable_by_key(|id| module_table[*id].stable_id());
    entry_points.extend(
      dynamic_import_entry_ids
        .into_iter()
        .map(|id| EntryPoint { name: None, id, kind: EntryPointKind::DynamicImport }),
    );

    let runtime = runtime.ok_or_else(|| anyhow::anyhow!("the runtime module was never loaded"))?;

    // Tasks finish in any order.
    warnings.sort_by_cached_key(ToString::to_string);

    Ok(ModuleLoaderOutput {
      symbols: self.symbols,
      module_table,
      entry_points,
      runtime,
      warnings,
    })
  }

  fn try_spawn_new_task(
    &mut self,
    resolved_id: ResolvedId,
    owner: Option<ModuleTaskOwner>,
    is_user_defined_entry: bool,
  ) -> ModuleIdx {
    match self.visited.entry(ArcStr::clone(&resolved_id.id)) {
      Entry::Occupied(visited) => *visited.get(),
      Entry::Vacant(not_visited) => {
        let idx = self.modules.push(None);

        if resolved_id.is_external {
          let namespace_ref = self
            .symbols
            .create_facade_root_symbol_ref(idx, &legitimize_identifier_name(&resolved_id.id));
          self.modules[idx] =
            Some(ExternalModule::new(idx, ModuleId::new(resolved_id.id), namespace_ref).into());
        } else {
          self.remaining += 1;

          let task = ModuleTask::new(
            Arc::clone(&self.shared_context),
            idx,
            owner,
            resolved_id,
            is_user_defined_entry,
          );

          tokio::spawn(task.run());
        }

        *not_visited.insert(idx)
      }
    }
  }
}
