pub mod ast_scanner;
pub mod module_loader;

mod module_task;
mod task_context;

use std::sync::Arc;

use arcstr::ArcStr;
use module_loader::{ModuleLoader, ModuleLoaderOutput};
use module_task::ModuleTaskOwner;
use webdeps_error::BuildResult;
use webdeps_fs::OsFileSystem;
use webdeps_utils::{concat_string, path_ext::PathExt, rstr::Rstr};

use crate::{
  types::{virtual_entry_map::VirtualEntryMap, SharedOptions, SharedResolver},
  utils::resolve_id::{resolve_id, ResolveIdReturn},
};

pub type ScanStageOutput = ModuleLoaderOutput;

pub struct ScanStage {
  fs: OsFileSystem,
  options: SharedOptions,
  resolver: SharedResolver,
}

impl ScanStage {
  pub fn new(fs: OsFileSystem, options: SharedOptions, resolver: SharedResolver) -> Self {
    Self { fs, options, resolver }
  }

  #[tracing::instrument(level = "debug", skip_all)]
  pub async fn scan(&self, entries: &VirtualEntryMap) -> BuildResult<ScanStageOutput> {
    let mut errors: Vec<anyhow::Error> = vec![];
    let mut user_defined_entries = Vec::with_capacity(entries.len());
    for (name, entry) in entries {
      let importer = concat_string!("the \"module\" field of ", entry.package_name);
      let specifier = entry.path.expect_to_slash();
      match resolve_id(&self.resolver, &self.options, None, &importer, &specifier) {
        Ok(ResolveIdReturn { resolved, .. }) => {
          let owner = ModuleTaskOwner::new(importer.into(), Rstr::new(&entry.package_name));
          user_defined_entries.push((ArcStr::from(name.as_str()), resolved, owner));
        }
        Err(err) => errors.push(err.into()),
      }
    }
    if !errors.is_empty() {
      Err(errors)?;
    }

    let module_loader =
      ModuleLoader::new(self.fs, Arc::clone(&self.options), Arc::clone(&self.resolver));
    let output = module_loader.fetch_all_modules(user_defined_entries).await?;
    tracing::debug!(
      "scanned {} modules from {} entries",
      output.module_table.len(),
      output.entry_points.len()
    );
    Ok(output)
  }
}
