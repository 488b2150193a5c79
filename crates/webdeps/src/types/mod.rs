pub mod bundle_output;
pub mod linking_metadata;
pub mod virtual_entry_map;

use std::sync::Arc;

use oxc_index::IndexVec;
use webdeps_common::{AssetIdx, BundleOptions, InstantiatedChunk, Module, ModuleIdx};
use webdeps_resolver::Resolver;

pub type IndexModules = IndexVec<ModuleIdx, Module>;
pub type IndexInstantiatedChunks = IndexVec<AssetIdx, InstantiatedChunk>;

pub type SharedResolver = Arc<Resolver>;
pub type SharedOptions = Arc<BundleOptions>;
