use std::path::Path;

use serde::Deserialize;
use webdeps_error::InstallError;
use webdeps_utils::indexmap::FxIndexMap;

use crate::NamedExportsConfig;

/// The project's own `package.json`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectManifest {
  /// Package name to version range, in declaration order.
  pub dependencies: Option<FxIndexMap<String, String>>,
  pub webdeps: Option<WebdepsConfig>,
}

/// The `webdeps` block of the project manifest.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebdepsConfig {
  /// An explicit whitelist of packages to install. Every listed package must be web-native.
  pub web_dependencies: Option<Vec<String>>,
  pub named_exports: Option<NamedExportsConfig>,
  pub dest: Option<String>,
}

impl ProjectManifest {
  pub fn from_json(path: &Path, json: &str) -> Result<Self, InstallError> {
    serde_json::from_str(json).map_err(|err| InstallError::MalformedManifest {
      path: path.to_path_buf(),
      reason: err.to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keeps_dependency_order() {
    let manifest = ProjectManifest::from_json(
      Path::new("package.json"),
      r#"{
        "dependencies": { "preact": "^10.0.0", "@scope/pkg": "1.0.0", "htm": "^3.0.0" },
        "webdeps": { "webDependencies": ["htm"], "namedExports": { "react": ["useState"] }, "dest": "vendor" }
      }"#,
    )
    .unwrap();
    let names = manifest.dependencies.unwrap().into_keys().collect::<Vec<_>>();
    assert_eq!(names, ["preact", "@scope/pkg", "htm"]);
    let config = manifest.webdeps.unwrap();
    assert_eq!(config.web_dependencies.unwrap(), ["htm"]);
    assert_eq!(config.named_exports.unwrap()["react"], ["useState"]);
    assert_eq!(config.dest.as_deref(), Some("vendor"));
  }

  #[test]
  fn rejects_wrong_types() {
    let err = ProjectManifest::from_json(
      Path::new("package.json"),
      r#"{ "webdeps": { "webDependencies": "preact" } }"#,
    )
    .unwrap_err();
    assert!(matches!(err, InstallError::MalformedManifest { .. }));
  }
}
