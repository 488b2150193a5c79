use std::path::{Path, PathBuf};

use sugar_path::SugarPath;
use webdeps_common::PackageManifest;
use webdeps_error::{BuildResult, InstallError};
use webdeps_fs::FileSystem;
use webdeps_utils::{
  rayon::{IntoParallelRefIterator, ParallelIterator},
  sanitize_file_name::sanitize_package_name,
};

use crate::{
  dependency_set::{DependencySpecSet, SpecMode},
  types::virtual_entry_map::{VirtualEntry, VirtualEntryMap},
};

/// An installed package and the file its `module` field points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
  pub name: String,
  pub dir: PathBuf,
  pub entry: PathBuf,
}

/// Locates `<cwd>/node_modules/<name>` and reads its native entry point.
///
/// Returns `Ok(None)` for a package without a `module` entry in [`SpecMode::Inferred`].
pub fn resolve_package(
  fs: &dyn FileSystem,
  cwd: &Path,
  name: &str,
  mode: SpecMode,
) -> Result<Option<PackageReference>, InstallError> {
  let dir = cwd.join("node_modules").join(name);
  if !fs.is_dir(&dir) {
    return Err(InstallError::PackageNotInstalled { name: name.to_string(), dir });
  }

  let manifest_path = dir.join("package.json");
  let json = fs.read_to_string(&manifest_path).map_err(|err| InstallError::io(&manifest_path, err))?;
  let manifest = PackageManifest::from_json(&manifest_path, &json)?;

  let Some(module) = manifest.module_entry() else {
    return match mode {
      SpecMode::Whitelist => Err(InstallError::NotWebNative { name: name.to_string() }),
      SpecMode::Inferred => {
        tracing::debug!("skipping {name}: no \"module\" entry");
        Ok(None)
      }
    };
  };

  let entry = dir.join(module).normalize();
  Ok(Some(PackageReference { name: name.to_string(), dir, entry }))
}

/// Resolves every package of the set in parallel. Entries keep the order of the set.
pub fn resolve_packages(
  fs: &dyn FileSystem,
  cwd: &Path,
  spec_set: &DependencySpecSet,
) -> BuildResult<VirtualEntryMap> {
  let names = spec_set.iter().collect::<Vec<_>>();
  let results = names
    .par_iter()
    .map(|name| resolve_package(fs, cwd, name, spec_set.mode))
    .collect::<Vec<_>>();

  let mut errors: Vec<anyhow::Error> = vec![];
  let mut entries = VirtualEntryMap::default();
  for result in results {
    match result {
      Ok(Some(package)) => {
        let name = sanitize_package_name(&package.name);
        if let Some(existing) = entries.get(&name) {
          errors.push(
            InstallError::EntryNameCollision {
              first: existing.package_name.clone(),
              second: package.name,
              name,
            }
            .into(),
          );
          continue;
        }
        entries.insert(name, VirtualEntry { package_name: package.name, path: package.entry });
      }
      Ok(None) => {}
      Err(err) => errors.push(err.into()),
    }
  }
  if !errors.is_empty() {
    Err(errors)?;
  }
  Ok(entries)
}

#[cfg(test)]
mod tests {
  use webdeps_fs::OsFileSystem;
  use webdeps_utils::indexmap::FxIndexSet;

  use super::*;

  fn install(cwd: &Path, name: &str, manifest: &str) {
    let dir = cwd.join("node_modules").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("package.json"), manifest).unwrap();
  }

  fn spec_set(mode: SpecMode, names: &[&str]) -> DependencySpecSet {
    DependencySpecSet { mode, names: names.iter().map(ToString::to_string).collect::<FxIndexSet<_>>() }
  }

  #[test]
  fn resolves_in_spec_set_order() {
    let cwd = tempfile::tempdir().unwrap();
    install(cwd.path(), "preact", r#"{ "module": "dist/preact.mjs" }"#);
    install(cwd.path(), "@scope/pkg", r#"{ "module": "./index.js" }"#);
    install(cwd.path(), "htm", r#"{ "module": "htm.mjs" }"#);

    let entries =
      resolve_packages(&OsFileSystem, cwd.path(), &spec_set(SpecMode::Whitelist, &["preact", "@scope/pkg", "htm"]))
        .unwrap();
    assert_eq!(entries.keys().collect::<Vec<_>>(), ["preact", "@scope--pkg", "htm"]);
    assert_eq!(entries["@scope--pkg"].package_name, "@scope/pkg");
    assert_eq!(entries["@scope--pkg"].path, cwd.path().join("node_modules/@scope/pkg/index.js"));
  }

  #[test]
  fn missing_module_entry() {
    let cwd = tempfile::tempdir().unwrap();
    install(cwd.path(), "preact", r#"{ "module": "dist/preact.mjs" }"#);
    install(cwd.path(), "legacy-pkg", r#"{ "main": "index.js" }"#);

    let entries =
      resolve_packages(&OsFileSystem, cwd.path(), &spec_set(SpecMode::Inferred, &["preact", "legacy-pkg"]))
        .unwrap();
    assert_eq!(entries.keys().collect::<Vec<_>>(), ["preact"]);

    let err =
      resolve_packages(&OsFileSystem, cwd.path(), &spec_set(SpecMode::Whitelist, &["preact", "legacy-pkg"]))
        .unwrap_err();
    assert!(matches!(err.find::<InstallError>(), Some(InstallError::NotWebNative { name }) if name == "legacy-pkg"));
  }

  #[test]
  fn package_must_be_installed() {
    let cwd = tempfile::tempdir().unwrap();
    let err = resolve_package(&OsFileSystem, cwd.path(), "preact", SpecMode::Inferred).unwrap_err();
    assert!(matches!(err, InstallError::PackageNotInstalled { .. }));
  }

  #[test]
  fn malformed_package_manifest() {
    let cwd = tempfile::tempdir().unwrap();
    install(cwd.path(), "broken", r#"{ "module": ["a.js"] }"#);
    let err = resolve_package(&OsFileSystem, cwd.path(), "broken", SpecMode::Inferred).unwrap_err();
    assert!(matches!(err, InstallError::MalformedManifest { .. }));
  }

  #[test]
  fn packages_sharing_an_entry_name() {
    let cwd = tempfile::tempdir().unwrap();
    install(cwd.path(), "@a-/b", r#"{ "module": "index.js" }"#);
    install(cwd.path(), "@a/-b", r#"{ "module": "index.js" }"#);

    let err = resolve_packages(&OsFileSystem, cwd.path(), &spec_set(SpecMode::Whitelist, &["@a-/b", "@a/-b"]))
      .unwrap_err();
    assert!(matches!(
      err.find::<InstallError>(),
      Some(InstallError::EntryNameCollision { name, first, second })
        if name == "@a---b" && first == "@a-/b" && second == "@a/-b"
    ));
  }
}
