use std::path::Path;

use serde::Deserialize;
use webdeps_error::InstallError;

/// The fields of an installed package's `package.json` the installer reads. Unknown fields are ignored, known
/// fields with the wrong type are an error.
#[derive(Debug, Default, Deserialize)]
pub struct PackageManifest {
  pub name: Option<String>,
  pub version: Option<String>,
  /// The ES module entry point.
  pub module: Option<String>,
  /// The legacy entry point.
  pub main: Option<String>,
}

impl PackageManifest {
  pub fn from_json(path: &Path, json: &str) -> Result<Self, InstallError> {
    serde_json::from_str(json).map_err(|err| InstallError::MalformedManifest {
      path: path.to_path_buf(),
      reason: err.to_string(),
    })
  }

  /// The `module` entry with an empty string treated as missing.
  pub fn module_entry(&self) -> Option<&str> {
    self.module.as_deref().filter(|entry| !entry.trim().is_empty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_known_fields() {
    let manifest = PackageManifest::from_json(
      Path::new("package.json"),
      r#"{"name":"preact","version":"10.0.0","module":"dist/preact.mjs","main":"dist/preact.js","scripts":{}}"#,
    )
    .unwrap();
    assert_eq!(manifest.name.as_deref(), Some("preact"));
    assert_eq!(manifest.module_entry(), Some("dist/preact.mjs"));
  }

  #[test]
  fn empty_module_is_missing() {
    let manifest =
      PackageManifest::from_json(Path::new("package.json"), r#"{"module":""}"#).unwrap();
    assert_eq!(manifest.module_entry(), None);
  }

  #[test]
  fn wrong_field_type_is_malformed() {
    let err = PackageManifest::from_json(Path::new("pkg/package.json"), r#"{"module":42}"#)
      .unwrap_err();
    assert!(matches!(err, InstallError::MalformedManifest { .. }));

    let err = PackageManifest::from_json(Path::new("pkg/package.json"), "{").unwrap_err();
    assert!(err.to_string().starts_with("malformed manifest pkg/package.json"));
  }
}
