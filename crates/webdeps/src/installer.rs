use std::path::PathBuf;

use webdeps_common::{InstallOptions, OutputChunk, ProjectManifest};
use webdeps_error::{BuildResult, InstallError};
use webdeps_fs::{FileSystem, OsFileSystem};

use crate::{
  bundler::Bundler,
  dependency_set::build_spec_set,
  emitter::emit,
  manifest_resolver::resolve_packages,
  status::StatusReporter,
  types::{bundle_output::BundleOutput, virtual_entry_map::VirtualEntryMap},
  utils::normalize_options::{normalize_options, resolve_cwd},
};

/// What an install wrote.
#[derive(Debug)]
pub struct InstallOutput {
  /// The absolute output directory.
  pub dest: PathBuf,
  /// The installed packages. Packages skipped because they aren't web-native are absent.
  pub entries: VirtualEntryMap,
  pub chunks: Vec<OutputChunk>,
  pub warnings: Vec<anyhow::Error>,
}

/// Turns the dependencies of a project into browser-native modules.
pub struct Installer {
  fs: OsFileSystem,
  options: InstallOptions,
}

impl Installer {
  pub fn new(options: InstallOptions) -> Self {
    Self { fs: OsFileSystem, options }
  }

  /// Runs the whole pipeline and reports the outcome to `reporter`.
  pub async fn install(&self, reporter: &dyn StatusReporter) -> BuildResult<InstallOutput> {
    let result = self.run(reporter).await;
    match &result {
      Ok(output) => reporter.on_success(output),
      Err(error) => reporter.on_error(error),
    }
    result
  }

  async fn run(&self, reporter: &dyn StatusReporter) -> BuildResult<InstallOutput> {
    let cwd = resolve_cwd(self.options.cwd.clone())?;
    let manifest_path = cwd.join("package.json");
    let json =
      self.fs.read_to_string(&manifest_path).map_err(|err| InstallError::io(&manifest_path, err))?;
    let manifest = ProjectManifest::from_json(&manifest_path, &json)?;

    let options =
      normalize_options(InstallOptions { cwd: Some(cwd), ..self.options.clone() }, &manifest)?;
    let spec_set = build_spec_set(&manifest)?;
    reporter.on_start(spec_set.len());

    let entries = resolve_packages(&self.fs, &options.cwd, &spec_set)?;
    reporter.on_progress(&format!("resolved {} of {} packages", entries.len(), spec_set.len()));

    // Every package was skipped. The output directory still gets replaced by an empty import map.
    let output = if entries.is_empty() {
      BundleOutput::default()
    } else {
      Bundler::new(options.to_bundle_options()).bundle(&entries).await?
    };
    for warning in &output.warnings {
      reporter.on_warning(warning);
    }
    reporter.on_progress(&format!("bundled {} chunks", output.chunks.len()));

    emit(&self.fs, &output, &entries, &options.dest)?;

    let BundleOutput { chunks, warnings } = output;
    Ok(InstallOutput { dest: options.dest, entries, chunks, warnings })
  }
}
