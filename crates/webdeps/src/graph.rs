use rustc_hash::FxHashMap;
use webdeps_common::{Chunk, ChunkIdx, ChunkTable, ModuleIdx};

/// The chunks of one bundle.
#[derive(Debug, Default)]
pub struct ChunkGraph {
  pub chunk_table: ChunkTable,
  /// Sorted by the execution order of each chunk's first module.
  pub sorted_chunk_idx_vec: Vec<ChunkIdx>,
  /// Package entries and dynamic import targets to the chunk that exports them.
  pub entry_module_to_entry_chunk: FxHashMap<ModuleIdx, ChunkIdx>,
}

impl ChunkGraph {
  pub fn add_chunk(&mut self, chunk: Chunk) -> ChunkIdx {
    self.chunk_table.push(chunk)
  }

  /// Modules must be added in execution order.
  pub fn add_module_to_chunk(&mut self, module_idx: ModuleIdx, chunk_idx: ChunkIdx) {
    self.chunk_table[chunk_idx].modules.push(module_idx);
  }
}
