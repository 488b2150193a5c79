use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use sugar_path::SugarPath;
use webdeps_common::{InstallOptions, NormalizedInstallOptions, ProjectManifest};
use webdeps_error::InstallError;
use webdeps_utils::rstr::Rstr;

pub const DEFAULT_DEST: &str = "web_modules";

/// Fills in defaults. Values passed by the caller win over the `webdeps` block of the project manifest.
pub fn normalize_options(
  raw_options: InstallOptions,
  manifest: &ProjectManifest,
) -> Result<NormalizedInstallOptions, InstallError> {
  let cwd = resolve_cwd(raw_options.cwd)?;
  let config = manifest.webdeps.as_ref();

  let dest = raw_options
    .dest
    .or_else(|| config.and_then(|config| config.dest.as_ref()).map(PathBuf::from))
    .unwrap_or_else(|| PathBuf::from(DEFAULT_DEST));
  let dest = cwd.join(dest).normalize();
  check_dest(&cwd, &dest)?;

  let mut named_exports: FxHashMap<String, Vec<Rstr>> = FxHashMap::default();
  let configured = config.and_then(|config| config.named_exports.as_ref());
  for (package, names) in configured.into_iter().flatten().chain(raw_options.named_exports.iter().flatten()) {
    named_exports.insert(package.clone(), names.iter().map(|name| Rstr::new(name)).collect());
  }

  Ok(NormalizedInstallOptions {
    cwd,
    dest,
    strict: raw_options.strict.unwrap_or(false),
    builtins: raw_options.builtins.unwrap_or(false),
    source_map: raw_options.source_map.unwrap_or(true),
    named_exports,
    node_env: Rstr::new(raw_options.node_env.as_deref().unwrap_or("production")),
  })
}

/// `dest` is wiped on every install, so it must not hold the project or its installed packages.
fn check_dest(cwd: &Path, dest: &Path) -> Result<(), InstallError> {
  let reason = if cwd.starts_with(dest) {
    "the output directory would contain the project directory"
  } else if dest.starts_with(cwd.join("node_modules")) {
    "the output directory must not be inside node_modules"
  } else {
    return Ok(());
  };
  Err(InstallError::InvalidOptions { option: "dest", reason: format!("{}: {reason}", dest.display()) })
}

/// The project directory, made absolute.
pub fn resolve_cwd(cwd: Option<PathBuf>) -> Result<PathBuf, InstallError> {
  match cwd {
    Some(cwd) => Ok(cwd.absolutize()),
    None => std::env::current_dir().map_err(|err| InstallError::io(".", err)),
  }
}

#[cfg(test)]
mod tests {
  use webdeps_common::WebdepsConfig;
  use webdeps_utils::indexmap::FxIndexMap;

  use super::*;

  #[test]
  fn defaults() {
    let options = InstallOptions { cwd: Some("/project".into()), ..InstallOptions::default() };
    let normalized = normalize_options(options, &ProjectManifest::default()).unwrap();
    assert_eq!(normalized.dest, Path::new("/project/web_modules"));
    assert!(!normalized.strict);
    assert!(!normalized.builtins);
    assert!(normalized.source_map);
    assert_eq!(normalized.node_env.as_str(), "production");
  }

  #[test]
  fn caller_options_override_the_manifest() {
    let manifest = ProjectManifest {
      dependencies: None,
      webdeps: Some(WebdepsConfig {
        web_dependencies: None,
        named_exports: Some(FxIndexMap::from_iter([
          ("react".to_string(), vec!["useState".to_string()]),
          ("lodash".to_string(), vec!["map".to_string()]),
        ])),
        dest: Some("vendor".to_string()),
      }),
    };

    let normalized = normalize_options(
      InstallOptions { cwd: Some("/project".into()), ..InstallOptions::default() },
      &manifest,
    )
    .unwrap();
    assert_eq!(normalized.dest, Path::new("/project/vendor"));

    let options = InstallOptions {
      cwd: Some("/project".into()),
      dest: Some("public/modules".into()),
      named_exports: Some(FxIndexMap::from_iter([("react".to_string(), vec!["useEffect".to_string()])])),
      ..InstallOptions::default()
    };
    let normalized = normalize_options(options, &manifest).unwrap();
    assert_eq!(normalized.dest, Path::new("/project/public/modules"));
    assert_eq!(normalized.named_exports["react"], [Rstr::new("useEffect")]);
    assert_eq!(normalized.named_exports["lodash"], [Rstr::new("map")]);
  }

  #[test]
  fn dest_must_not_contain_the_project_or_its_packages() {
    for dest in [".", "", "..", "/", "node_modules", "node_modules/.cache/web", "web/../."] {
      let options = InstallOptions { cwd: Some("/project".into()), dest: Some(dest.into()), ..InstallOptions::default() };
      let err = normalize_options(options, &ProjectManifest::default()).unwrap_err();
      assert!(matches!(err, InstallError::InvalidOptions { option: "dest", .. }), "{dest:?} was accepted");
    }

    for dest in ["web_modules", "public/node_modules", "../sibling", "node_modules_web"] {
      let options = InstallOptions { cwd: Some("/project".into()), dest: Some(dest.into()), ..InstallOptions::default() };
      assert!(normalize_options(options, &ProjectManifest::default()).is_ok(), "{dest:?} was rejected");
    }
  }
}
