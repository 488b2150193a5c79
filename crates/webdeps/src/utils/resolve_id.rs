use std::path::Path;

use webdeps_common::{is_builtin_module, BundleOptions, ModuleId, ResolvedId};
use webdeps_error::{InstallError, UnresolvedImportHint};
use webdeps_resolver::{ResolveReturn, Resolver};
use webdeps_utils::concat_string;

use crate::polyfills::{builtin_virtual_id, EMPTY_MODULE_PREFIX};

/// What an import specifier refers to, plus a warning when it is left to the browser.
pub struct ResolveIdReturn {
  pub resolved: ResolvedId,
  pub warning: Option<InstallError>,
}

/// Resolves `specifier` as imported by the module `importer`. `None` is used for package entries, which are
/// given as absolute paths.
pub fn resolve_id(
  resolver: &Resolver,
  options: &BundleOptions,
  importer: Option<&ModuleId>,
  importer_stable_id: &str,
  specifier: &str,
) -> Result<ResolveIdReturn, InstallError> {
  if specifier.starts_with('\0') {
    return Ok(ResolveIdReturn { resolved: ResolvedId::new(specifier), warning: None });
  }

  let importer_path = importer.filter(|id| !id.is_virtual()).map(|id| Path::new(&**id));

  match resolver.resolve(importer_path, specifier) {
    Ok(ResolveReturn { path, ignored: true }) => {
      let stable = ModuleId::new(path).stabilize(resolver.cwd());
      Ok(ResolveIdReturn {
        resolved: ResolvedId::new(concat_string!(EMPTY_MODULE_PREFIX, stable)),
        warning: None,
      })
    }
    Ok(ResolveReturn { path, .. }) => {
      if !resolver.is_inside_jail(Path::new(path.as_str())) {
        return Err(InstallError::JailViolation {
          importer: importer_stable_id.to_string(),
          specifier: specifier.to_string(),
          resolved: path.as_str().into(),
          jail: resolver.jail().to_path_buf(),
        });
      }
      Ok(ResolveIdReturn { resolved: ResolvedId::new(path), warning: None })
    }
    Err(err) => match is_builtin_module(specifier) {
      Some(_) if options.shim_builtins => Ok(ResolveIdReturn {
        resolved: ResolvedId::new(builtin_virtual_id(specifier)),
        warning: None,
      }),
      Some(_) => Ok(ResolveIdReturn {
        resolved: ResolvedId::external(specifier),
        warning: Some(InstallError::UnresolvedImport {
          importer: importer_stable_id.to_string(),
          specifier: specifier.to_string(),
          hint: Some(UnresolvedImportHint::BuiltinsDisabled),
        }),
      }),
      None => {
        tracing::debug!("failed to resolve {specifier:?} from {importer_stable_id}: {err}");
        Err(InstallError::UnresolvedImport {
          importer: importer_stable_id.to_string(),
          specifier: specifier.to_string(),
          hint: None,
        })
      }
    },
  }
}
