use webdeps_error::BuildError;

use crate::installer::InstallOutput;

/// Receives progress of an install. Every method defaults to doing nothing.
pub trait StatusReporter: Send + Sync {
  /// `total` packages are about to be resolved.
  fn on_start(&self, _total: usize) {}

  fn on_progress(&self, _message: &str) {}

  fn on_warning(&self, _warning: &anyhow::Error) {}

  fn on_success(&self, _output: &InstallOutput) {}

  fn on_error(&self, _error: &BuildError) {}
}

pub struct NoopReporter;

impl StatusReporter for NoopReporter {}

/// Forwards status to `tracing` events.
pub struct TracingReporter;

impl StatusReporter for TracingReporter {
  fn on_start(&self, total: usize) {
    tracing::info!("installing {total} packages");
  }

  fn on_progress(&self, message: &str) {
    tracing::info!("{message}");
  }

  fn on_warning(&self, warning: &anyhow::Error) {
    tracing::warn!("{warning:#}");
  }

  fn on_success(&self, output: &InstallOutput) {
    tracing::info!(
      "installed {} packages into {} ({} chunks)",
      output.entries.len(),
      output.dest.display(),
      output.chunks.len()
    );
  }

  fn on_error(&self, error: &BuildError) {
    tracing::error!("{error}");
  }
}
