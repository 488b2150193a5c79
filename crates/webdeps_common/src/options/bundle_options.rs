use std::path::PathBuf;

use rustc_hash::FxHashMap;
use webdeps_utils::rstr::Rstr;

#[derive(Debug, Clone)]
pub struct BundleOptions {
  pub cwd: PathBuf,
  /// Where the chunks are going to be written. Source map `sources` are relative to it.
  pub dest: PathBuf,
  /// Convert CommonJS modules. When off, reaching one is an unresolved import.
  pub allow_legacy_format: bool,
  /// Satisfy Node.js built-in imports with polyfills and shim `process`, `global`, `__dirname` and `__filename`.
  pub shim_builtins: bool,
  pub source_map: bool,
  pub named_exports: FxHashMap<String, Vec<Rstr>>,
  pub node_env: Rstr,
}

impl BundleOptions {
  pub fn new(cwd: PathBuf) -> Self {
    let dest = cwd.join("web_modules");
    Self {
      cwd,
      dest,
      allow_legacy_format: true,
      shim_builtins: false,
      source_map: true,
      named_exports: FxHashMap::default(),
      node_env: Rstr::new("production"),
    }
  }

  pub fn configured_named_exports(&self, package_name: Option<&Rstr>) -> Option<&[Rstr]> {
    package_name.and_then(|name| self.named_exports.get(name.as_str())).map(Vec::as_slice)
  }
}
