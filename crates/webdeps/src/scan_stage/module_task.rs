use std::{path::Path, sync::Arc};

use arcstr::ArcStr;
use oxc::semantic::SemanticBuilder;
use oxc_index::IndexVec;
use webdeps_common::{
  ExportsKind, ImportRecordIdx, ModuleId, ModuleIdx, ModuleLoaderMsg, ModuleType, NormalModule,
  NormalModuleTaskResult, ResolvedId,
};
use webdeps_ecmascript::EcmaCompiler;
use webdeps_error::{BuildResult, InstallError, UnresolvedImportHint};
use webdeps_utils::{ecmascript::legitimize_identifier_name, path_ext::PathExt, rstr::Rstr};

use super::{
  ast_scanner::{AstScanResult, AstScanner},
  task_context::TaskContext,
};
use crate::utils::{
  load_source::{load_source, LoadedSource},
  resolve_id::{resolve_id, ResolveIdReturn},
};

/// Who asked for a module: the importer's stable id and the specifier it used.
#[derive(Debug, Clone)]
pub struct ModuleTaskOwner {
  importer_id: Rstr,
  specifier: Rstr,
}

impl ModuleTaskOwner {
  pub fn new(importer_id: Rstr, specifier: Rstr) -> Self {
    ModuleTaskOwner { importer_id, specifier }
  }
}

pub struct ModuleTask {
  ctx: Arc<TaskContext>,
  idx: ModuleIdx,
  owner: Option<ModuleTaskOwner>,
  resolved_id: ResolvedId,
  is_user_defined_entry: bool,
}

impl ModuleTask {
  pub fn new(
    ctx: Arc<TaskContext>,
    idx: ModuleIdx,
    owner: Option<ModuleTaskOwner>,
    resolved_id: ResolvedId,
    is_user_defined_entry: bool,
  ) -> Self {
    Self { ctx, idx, owner, resolved_id, is_user_defined_entry }
  }

  pub async fn run(self) {
    if let Err(errs) = self.run_inner().await {
      // The loader only stops receiving once every task reported back.
      let _ = self.ctx.tx.send(ModuleLoaderMsg::BuildErrors(errs.0)).await;
    }
  }

  async fn run_inner(&self) -> BuildResult<()> {
    let result = self.create_module()?;
    let _ = self.ctx.tx.send(ModuleLoaderMsg::NormalModuleDone(Box::new(result))).await;
    Ok(())
  }

  /// Loads, parses and scans the module. Kept synchronous so no AST data lives across an await point.
  fn create_module(&self) -> BuildResult<NormalModuleTaskResult> {
    let id = ModuleId::new(ArcStr::clone(&self.resolved_id.id));
    let stable_id = id.stabilize(&self.ctx.options.cwd);

    let LoadedSource { source, module_type, hint } = load_source(&self.ctx.fs, &id, &stable_id)?;

    let ast = EcmaCompiler::parse(&stable_id, ArcStr::clone(&source))?;
    let (symbol_table, scopes) =
      SemanticBuilder::new().build(ast.program()).semantic.into_symbol_table_and_scope_tree();

    let repr_name = repr_name_of(&id);
    let scanner =
      AstScanner::new(self.idx, &symbol_table, &scopes, &stable_id, &repr_name, &self.ctx.options);
    let AstScanResult {
      symbols,
      exports_kind,
      named_imports,
      named_exports,
      import_records: raw_import_records,
      star_exports,
      cjs_export_names,
      patches,
      declared_symbols,
      namespace_ref,
      wrapper_ref,
      reserved_names,
      warnings: scan_warnings,
    } = scanner.scan(ast.program(), hint);

    if matches!((exports_kind, module_type), (ExportsKind::CommonJs, ModuleType::Js))
      && !self.ctx.options.allow_legacy_format
    {
      let (importer, specifier) = self.owner.as_ref().map_or_else(
        || (stable_id.clone(), stable_id.clone()),
        |owner| (owner.importer_id.to_string(), owner.specifier.to_string()),
      );
      Err(InstallError::UnresolvedImport {
        importer,
        specifier,
        hint: Some(UnresolvedImportHint::LegacyFormatDisabled),
      })?;
    }

    let mut warnings = scan_warnings;
    let mut errors: Vec<anyhow::Error> = vec![];
    let resolved_deps = raw_import_records
      .iter()
      .filter_map(|record| {
        match resolve_id(
          &self.ctx.resolver,
          &self.ctx.options,
          Some(&id),
          &stable_id,
          &record.specifier,
        ) {
          Ok(ResolveIdReturn { resolved, warning }) => {
            warnings.extend(warning.map(anyhow::Error::from));
            Some(resolved)
          }
          Err(err) => {
            errors.push(err.into());
            None
          }
        }
      })
      .collect::<IndexVec<ImportRecordIdx, _>>();

    if !errors.is_empty() {
      Err(errors)?;
    }

    let module = NormalModule {
      idx: self.idx,
      package_name: package_name_of(&id),
      id,
      stable_id,
      repr_name,
      module_type,
      exports_kind,
      source,
      exec_order: u32::MAX,
      is_user_defined_entry: self.is_user_defined_entry,
      import_records: IndexVec::default(),
      named_imports,
      named_exports,
      star_exports,
      cjs_export_names,
      patches,
      declared_symbols,
      namespace_ref,
      wrapper_ref,
      reserved_names,
    };

    Ok(NormalModuleTaskResult { module, symbols, resolved_deps, raw_import_records, warnings })
  }
}

/// A legal identifier naming the module, e.g. `preact` for `node_modules/preact/dist/preact.mjs`.
fn repr_name_of(id: &ModuleId) -> String {
  let path_like = match id.strip_prefix('\0') {
    Some(virtual_id) => virtual_id.split_once(':').map_or(virtual_id, |(_, name)| name),
    None => &**id,
  };
  let repr_name = Path::new(path_like).representative_file_name();
  legitimize_identifier_name(&repr_name).into_owned()
}

/// The package owning the file, read from the path after the last `node_modules` segment.
fn package_name_of(id: &ModuleId) -> Option<Rstr> {
  let (_, rest) = id.rsplit_once("node_modules/")?;
  let mut segments = rest.split('/');
  let first = segments.next().filter(|segment| !segment.is_empty())?;
  if first.starts_with('@') {
    let second = segments.next()?;
    Some(format!("{first}/{second}").into())
  } else {
    Some(first.into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names_modules_after_their_files() {
    assert_eq!(repr_name_of(&ModuleId::new("/p/node_modules/lit-html/lit-html.js")), "lit_html");
    assert_eq!(repr_name_of(&ModuleId::new("/p/node_modules/vue/index.js")), "vue");
    assert_eq!(repr_name_of(&ModuleId::new("\0webdeps:runtime")), "runtime");
    assert_eq!(repr_name_of(&ModuleId::new("\0polyfill:events")), "events");
  }

  #[test]
  fn finds_the_owning_package() {
    let name = |id: &str| package_name_of(&ModuleId::new(id)).map(|name| name.to_string());
    assert_eq!(name("/p/node_modules/react/cjs/react.development.js").as_deref(), Some("react"));
    assert_eq!(name("/p/node_modules/@scope/pkg/index.mjs").as_deref(), Some("@scope/pkg"));
    assert_eq!(name("/p/node_modules/a/node_modules/b/lib/b.js").as_deref(), Some("b"));
    assert_eq!(name("\0polyfill:path"), None);
  }
}
