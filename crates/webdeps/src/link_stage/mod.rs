mod bind_imports_and_exports;
mod reference_needed_symbols;
mod sort_modules;

use oxc_index::IndexVec;
use webdeps_common::{EntryPoint, ModuleIdx, RuntimeModuleBrief, SymbolRefDb};
use webdeps_error::BuildResult;

use crate::types::{
  linking_metadata::{LinkingMetadata, LinkingMetadataVec},
  IndexModules, SharedOptions,
};

use super::scan_stage::ScanStageOutput;

#[derive(Debug)]
pub struct LinkStageOutput {
  pub module_table: IndexModules,
  pub entry_points: Vec<EntryPoint>,
  pub sorted_modules: Vec<ModuleIdx>,
  pub metadata: LinkingMetadataVec,
  pub symbols: SymbolRefDb,
  pub runtime: RuntimeModuleBrief,
  pub warnings: Vec<anyhow::Error>,
}

#[derive(Debug)]
pub struct LinkStage<'a> {
  pub module_table: IndexModules,
  pub entry_points: Vec<EntryPoint>,
  pub symbols: SymbolRefDb,
  pub runtime: RuntimeModuleBrief,
  pub sorted_modules: Vec<ModuleIdx>,
  pub metadata: LinkingMetadataVec,
  pub warnings: Vec<anyhow::Error>,
  pub errors: Vec<anyhow::Error>,
  pub options: &'a SharedOptions,
}

impl<'a> LinkStage<'a> {
  pub fn new(scan_stage_output: ScanStageOutput, options: &'a SharedOptions) -> Self {
    let ScanStageOutput { symbols, module_table, entry_points, runtime, warnings } =
      scan_stage_output;

    let metadata = module_table
      .iter()
      .map(|module| LinkingMetadata {
        dependencies: module
          .import_records()
          .filter(|rec| rec.kind.is_static())
          .map(|rec| rec.resolved_module())
          .collect(),
        ..LinkingMetadata::default()
      })
      .collect::<IndexVec<ModuleIdx, _>>();

    Self {
      module_table,
      entry_points,
      symbols,
      runtime,
      sorted_modules: vec![],
      metadata,
      warnings,
      errors: vec![],
      options,
    }
  }

  #[tracing::instrument(level = "debug", skip_all)]
  pub fn link(mut self) -> BuildResult<LinkStageOutput> {
    self.sort_modules();
    self.bind_imports_and_exports();
    if !self.errors.is_empty() {
      Err(std::mem::take(&mut self.errors))?;
    }
    self.reference_needed_symbols();

    Ok(LinkStageOutput {
      module_table: self.module_table,
      entry_points: self.entry_points,
      sorted_modules: self.sorted_modules,
      metadata: self.metadata,
      symbols: self.symbols,
      runtime: self.runtime,
      warnings: self.warnings,
    })
  }
}
