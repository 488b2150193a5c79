use std::{fmt::Display, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedImportHint {
  /// The specifier names a host built-in and polyfills are turned off.
  BuiltinsDisabled,
  /// The target is a CommonJS module and legacy interop is turned off.
  LegacyFormatDisabled,
}

impl Display for UnresolvedImportHint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::BuiltinsDisabled => {
        f.write_str("it is a Node.js built-in module; builtins shimming is disabled (pass `--builtins` to polyfill it)")
      }
      Self::LegacyFormatDisabled => {
        f.write_str("it resolves to a CommonJS module; legacy format interop is disabled in strict mode")
      }
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
  #[error("no dependencies to install: `webdeps.webDependencies` and `dependencies` are both empty")]
  EmptyDependencySet,

  #[error("package \"{name}\" is not installed: {} does not exist", dir.display())]
  PackageNotInstalled { name: String, dir: PathBuf },

  #[error("package \"{name}\" is not web-native: its package.json has no \"module\" entry")]
  NotWebNative { name: String },

  #[error("malformed manifest {}: {reason}", path.display())]
  MalformedManifest { path: PathBuf, reason: String },

  #[error("could not resolve \"{specifier}\" from {importer}{}", hint.map(|hint| format!(": {hint}")).unwrap_or_default())]
  UnresolvedImport { importer: String, specifier: String, hint: Option<UnresolvedImportHint> },

  #[error("\"{specifier}\" imported by {importer} resolves to {} which is outside of {}", resolved.display(), jail.display())]
  JailViolation { importer: String, specifier: String, resolved: PathBuf, jail: PathBuf },

  #[error("\"{name}\" is not exported by {exporter}, imported by {importer}")]
  MissingExport { importer: String, exporter: String, name: String },

  #[error("failed to parse {module}: {message}")]
  ParseError { module: String, message: String },

  #[error("invalid option `{option}`: {reason}")]
  InvalidOptions { option: &'static str, reason: String },

  #[error("packages \"{first}\" and \"{second}\" would both be written to {name}.js")]
  EntryNameCollision { name: String, first: String, second: String },

  #[error("{}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl InstallError {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }
}

#[test]
fn unresolved_import_message_carries_the_hint() {
  let error = InstallError::UnresolvedImport {
    importer: "node_modules/pkg/index.mjs".to_string(),
    specifier: "fs".to_string(),
    hint: Some(UnresolvedImportHint::BuiltinsDisabled),
  };
  let message = error.to_string();
  assert!(message.starts_with("could not resolve \"fs\" from node_modules/pkg/index.mjs: "));
  assert!(message.contains("builtins shimming is disabled"));

  let error = InstallError::UnresolvedImport {
    importer: "a.mjs".to_string(),
    specifier: "./b".to_string(),
    hint: None,
  };
  assert_eq!(error.to_string(), "could not resolve \"./b\" from a.mjs");
}
