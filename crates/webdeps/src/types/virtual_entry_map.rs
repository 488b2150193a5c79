use std::path::PathBuf;

use webdeps_utils::indexmap::FxIndexMap;

/// The native entry point of one requested package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEntry {
  /// The package name as written in the project manifest.
  pub package_name: String,
  /// Absolute path of the file the package's `module` field points to.
  pub path: PathBuf,
}

/// Sanitized package name to its entry, in dependency set order. Every key becomes one entry chunk.
pub type VirtualEntryMap = FxIndexMap<String, VirtualEntry>;
