use std::path::PathBuf;

use rustc_hash::FxHashMap;
use webdeps_utils::rstr::Rstr;

use crate::BundleOptions;

#[derive(Debug, Clone)]
pub struct NormalizedInstallOptions {
  pub cwd: PathBuf,
  /// Absolute.
  pub dest: PathBuf,
  pub strict: bool,
  pub builtins: bool,
  pub source_map: bool,
  pub named_exports: FxHashMap<String, Vec<Rstr>>,
  pub node_env: Rstr,
}

impl NormalizedInstallOptions {
  pub fn to_bundle_options(&self) -> BundleOptions {
    BundleOptions {
      cwd: self.cwd.clone(),
      dest: self.dest.clone(),
      allow_legacy_format: !self.strict,
      shim_builtins: self.builtins,
      source_map: self.source_map,
      named_exports: self.named_exports.clone(),
      node_env: self.node_env.clone(),
    }
  }
}
