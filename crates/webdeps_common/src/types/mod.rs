pub mod chunk_kind;
pub mod entry_point;
pub mod exports_kind;
pub mod import_kind;
pub mod import_record;
pub mod instantiated_chunk;
pub mod local_export;
pub mod module_id;
pub mod named_import;
pub mod output_chunk;
pub mod patch;
pub mod raw_idx;
pub mod resolved_id;
pub mod symbol_ref;
pub mod symbol_ref_db;
