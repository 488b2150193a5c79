mod args;
mod reporter;

use std::{process::ExitCode, time::Instant};

use args::{EnhanceArgs, InputArgs, OutputArgs};
use clap::Parser;
use reporter::ConsoleReporter;
use tracing_subscriber::EnvFilter;
use webdeps::{InstallOptions, Installer};

/// Turns the dependencies of a project into browser-native ES modules.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  #[clap(flatten)]
  input: InputArgs,

  #[clap(flatten)]
  output: OutputArgs,

  #[clap(flatten)]
  enhance: EnhanceArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_env("WEBDEPS_LOG"))
    .with_writer(std::io::stderr)
    .init();

  let args = Commands::parse();
  let installer = Installer::new(InstallOptions {
    cwd: args.input.cwd,
    dest: args.output.dest,
    strict: Some(args.enhance.strict),
    builtins: Some(args.enhance.builtins),
    source_map: Some(!args.output.no_source_map),
    named_exports: None,
    node_env: args.enhance.node_env,
  });

  let reporter = ConsoleReporter { silent: args.enhance.silent, start: Instant::now() };
  match installer.install(&reporter).await {
    Ok(_) => ExitCode::SUCCESS,
    Err(_) => ExitCode::FAILURE,
  }
}
