use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct InputArgs {
  /// The project directory holding `package.json` and `node_modules`.
  #[clap(long)]
  pub cwd: Option<PathBuf>,
}

#[derive(Args)]
pub struct OutputArgs {
  /// Output directory, relative to the project directory.
  #[clap(long, short = 'd')]
  pub dest: Option<PathBuf>,

  /// Don't write `.map` files.
  #[clap(long)]
  pub no_source_map: bool,
}

#[derive(Args)]
pub struct EnhanceArgs {
  /// Fail on CommonJS modules instead of converting them.
  #[clap(long)]
  pub strict: bool,

  /// Polyfill Node.js built-in modules and globals.
  #[clap(long)]
  pub builtins: bool,

  /// The value `process.env.NODE_ENV` is replaced with.
  #[clap(long)]
  pub node_env: Option<String>,

  /// Only print errors.
  #[clap(long, short = 's')]
  pub silent: bool,
}
