mod builtins;
mod chunk;
mod manifest;
mod module;
mod module_loader;
mod options;
mod types;

pub use crate::{
  builtins::{is_builtin_module, NODE_BUILTIN_MODULES},
  chunk::{
    types::{cross_chunk_import_item::CrossChunkImportItem, preliminary_filename::PreliminaryFilename},
    Chunk, ChunkTable, COMMON_DIR,
  },
  manifest::{
    package_manifest::PackageManifest,
    project_manifest::{ProjectManifest, WebdepsConfig},
  },
  module::{external_module::ExternalModule, normal_module::NormalModule, Module},
  module_loader::{
    runtime_module_brief::{RuntimeModuleBrief, RUNTIME_MODULE_ID},
    task_result::NormalModuleTaskResult,
    ModuleLoaderMsg,
  },
  options::{
    bundle_options::BundleOptions,
    install_options::{InstallOptions, NamedExportsConfig},
    normalized_install_options::NormalizedInstallOptions,
  },
  types::{
    chunk_kind::ChunkKind,
    entry_point::{EntryPoint, EntryPointKind},
    exports_kind::{ExportsKind, ModuleType},
    import_kind::ImportKind,
    import_record::{ImportRecord, ImportRecordMeta, RawImportRecord, ResolvedImportRecord},
    instantiated_chunk::InstantiatedChunk,
    local_export::LocalExport,
    module_id::ModuleId,
    named_import::{NamedImport, Specifier},
    output_chunk::OutputChunk,
    patch::Patch,
    raw_idx::{AssetIdx, ChunkIdx, ImportRecordIdx, ModuleIdx, SymbolIdx},
    resolved_id::ResolvedId,
    symbol_ref::SymbolRef,
    symbol_ref_db::{SymbolRefData, SymbolRefDb, SymbolRefDbForModule},
  },
};
