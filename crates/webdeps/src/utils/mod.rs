pub mod chunk;
pub mod load_source;
pub mod normalize_options;
pub mod renamer;
pub mod resolve_id;
