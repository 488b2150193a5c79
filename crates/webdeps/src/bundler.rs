use std::sync::Arc;

use webdeps_common::BundleOptions;
use webdeps_error::BuildResult;
use webdeps_fs::OsFileSystem;
use webdeps_resolver::Resolver;

use crate::{
  generate_stage::GenerateStage,
  link_stage::LinkStage,
  scan_stage::ScanStage,
  types::{bundle_output::BundleOutput, virtual_entry_map::VirtualEntryMap, SharedOptions, SharedResolver},
};

/// Bundles every entry of a [`VirtualEntryMap`] into one set of chunks.
pub struct Bundler {
  fs: OsFileSystem,
  options: SharedOptions,
  resolver: SharedResolver,
}

impl Bundler {
  pub fn new(options: BundleOptions) -> Self {
    let resolver: SharedResolver = Resolver::new(options.cwd.clone()).into();
    Self { fs: OsFileSystem, options: Arc::new(options), resolver }
  }

  #[tracing::instrument(level = "debug", skip_all)]
  pub async fn bundle(&self, entries: &VirtualEntryMap) -> BuildResult<BundleOutput> {
    let scan_stage_output =
      ScanStage::new(self.fs, Arc::clone(&self.options), Arc::clone(&self.resolver))
        .scan(entries)
        .await?;

    let mut link_stage_output = LinkStage::new(scan_stage_output, &self.options).link()?;

    Ok(GenerateStage::new(&mut link_stage_output, &self.options).generate())
  }
}
