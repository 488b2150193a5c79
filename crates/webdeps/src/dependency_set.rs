use webdeps_common::ProjectManifest;
use webdeps_error::InstallError;
use webdeps_utils::indexmap::FxIndexSet;

/// Where the names of a [`DependencySpecSet`] come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecMode {
  /// `webdeps.webDependencies`: every package must be web-native.
  Whitelist,
  /// Every key of `dependencies`: packages that aren't web-native are skipped.
  Inferred,
}

/// The packages to install, in declaration order, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpecSet {
  pub mode: SpecMode,
  pub names: FxIndexSet<String>,
}

impl DependencySpecSet {
  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.names.iter().map(String::as_str)
  }
}

pub fn build_spec_set(manifest: &ProjectManifest) -> Result<DependencySpecSet, InstallError> {
  let whitelist = manifest.webdeps.as_ref().and_then(|config| config.web_dependencies.as_ref());

  let spec_set = match whitelist {
    Some(names) => {
      DependencySpecSet { mode: SpecMode::Whitelist, names: names.iter().cloned().collect() }
    }
    None => DependencySpecSet {
      mode: SpecMode::Inferred,
      names: manifest.dependencies.iter().flat_map(|deps| deps.keys().cloned()).collect(),
    },
  };

  if spec_set.is_empty() {
    return Err(InstallError::EmptyDependencySet);
  }
  tracing::debug!("{} packages to install ({:?} mode)", spec_set.len(), spec_set.mode);
  Ok(spec_set)
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::*;

  fn manifest(json: &str) -> ProjectManifest {
    ProjectManifest::from_json(Path::new("package.json"), json).unwrap()
  }

  #[test]
  fn whitelist_wins_over_dependencies() {
    let spec_set = build_spec_set(&manifest(
      r#"{ "dependencies": { "react": "*" }, "webdeps": { "webDependencies": ["preact", "htm", "preact"] } }"#,
    ))
    .unwrap();
    assert_eq!(spec_set.mode, SpecMode::Whitelist);
    assert_eq!(spec_set.iter().collect::<Vec<_>>(), ["preact", "htm"]);
  }

  #[test]
  fn infers_from_dependencies() {
    let spec_set =
      build_spec_set(&manifest(r#"{ "dependencies": { "preact": "^10", "@scope/pkg": "1" } }"#)).unwrap();
    assert_eq!(spec_set.mode, SpecMode::Inferred);
    assert_eq!(spec_set.iter().collect::<Vec<_>>(), ["preact", "@scope/pkg"]);
  }

  #[test]
  fn empty_set_is_an_error() {
    assert!(matches!(build_spec_set(&manifest("{}")), Err(InstallError::EmptyDependencySet)));
    assert!(matches!(
      build_spec_set(&manifest(r#"{ "dependencies": { "a": "1" }, "webdeps": { "webDependencies": [] } }"#)),
      Err(InstallError::EmptyDependencySet)
    ));
  }
}
