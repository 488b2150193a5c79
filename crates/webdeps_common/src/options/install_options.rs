use std::path::PathBuf;

use webdeps_utils::indexmap::FxIndexMap;

/// Package name to the export names of a CommonJS package that can't be detected statically.
pub type NamedExportsConfig = FxIndexMap<String, Vec<String>>;

/// Options as given by the caller. Every field is optional; see `normalize_options` for the defaults.
#[derive(Debug, Default, Clone)]
pub struct InstallOptions {
  /// The project directory holding `package.json` and `node_modules`. Defaults to the current directory.
  pub cwd: Option<PathBuf>,
  /// Output directory, relative to `cwd`. Overrides `webdeps.dest`, defaults to `web_modules`.
  pub dest: Option<PathBuf>,
  /// Refuse CommonJS modules instead of converting them.
  pub strict: Option<bool>,
  /// Polyfill Node.js built-in modules and shim Node.js globals.
  pub builtins: Option<bool>,
  /// Emit a `.map` next to every chunk. Defaults to `true`.
  pub source_map: Option<bool>,
  /// Merged with `webdeps.namedExports`; these take precedence.
  pub named_exports: Option<NamedExportsConfig>,
  /// The value `process.env.NODE_ENV` is replaced with. Defaults to `production`.
  pub node_env: Option<String>,
}
