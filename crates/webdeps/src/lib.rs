mod bundler;
mod dependency_set;
mod emitter;
mod generate_stage;
mod graph;
mod installer;
mod link_stage;
mod manifest_resolver;
mod polyfills;
mod scan_stage;
mod status;
mod types;
mod utils;

pub use crate::{
  bundler::Bundler,
  dependency_set::{build_spec_set, DependencySpecSet, SpecMode},
  emitter::{emit, IMPORT_MAP_FILENAME},
  installer::{InstallOutput, Installer},
  manifest_resolver::{resolve_package, resolve_packages, PackageReference},
  status::{NoopReporter, StatusReporter, TracingReporter},
  types::{
    bundle_output::BundleOutput,
    virtual_entry_map::{VirtualEntry, VirtualEntryMap},
  },
  utils::normalize_options::{normalize_options, DEFAULT_DEST},
};
pub use webdeps_common::*;
pub use webdeps_error::{BuildError, BuildResult, InstallError, UnresolvedImportHint};
pub use webdeps_fs::{FileSystem, OsFileSystem};
