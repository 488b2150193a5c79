use arcstr::ArcStr;
use oxc_index::{index_vec, IndexVec};
use rustc_hash::FxHashMap;
use webdeps_common::{Chunk, ChunkKind, ModuleIdx};
use webdeps_utils::bitset::BitSet;

use crate::graph::ChunkGraph;

use super::GenerateStage;

impl GenerateStage<'_> {
  /// One chunk per entry point, plus one common chunk for every distinct set of entries that share modules. A
  /// module shared by several entries is loaded once, from the common chunk.
  pub fn generate_chunks(&self) -> ChunkGraph {
    let entries_len = u32::try_from(self.link_output.entry_points.len()).unwrap_or(u32::MAX);
    let mut module_to_bits = index_vec![BitSet::new(entries_len); self.link_output.module_table.len()];
    let mut chunk_graph = ChunkGraph::default();
    let mut bits_to_chunk = FxHashMap::default();

    for (bit, entry) in (0..entries_len).zip(&self.link_output.entry_points) {
      let mut bits = BitSet::new(entries_len);
      bits.set_bit(bit);
      let chunk = Chunk::new(
        entry.name.clone().unwrap_or_default(),
        bits.clone(),
        vec![],
        ChunkKind::EntryPoint { is_user_defined: entry.kind.is_user_defined(), bit, module: entry.id },
      );
      let chunk_idx = chunk_graph.add_chunk(chunk);
      bits_to_chunk.insert(bits, chunk_idx);
      chunk_graph.entry_module_to_entry_chunk.entry(entry.id).or_insert(chunk_idx);
      self.determine_reachable_modules_for_entry(entry.id, bit, &mut module_to_bits);
    }

    for module_idx in &self.link_output.sorted_modules {
      let bits = &module_to_bits[*module_idx];
      // An unused runtime module
      if bits.is_empty() {
        continue;
      }
      let chunk_idx = if let Some(chunk_idx) = bits_to_chunk.get(bits) {
        *chunk_idx
      } else {
        let chunk = Chunk::new(ArcStr::default(), bits.clone(), vec![], ChunkKind::Common);
        let chunk_idx = chunk_graph.add_chunk(chunk);
        bits_to_chunk.insert(bits.clone(), chunk_idx);
        chunk_idx
      };
      chunk_graph.add_module_to_chunk(*module_idx, chunk_idx);
    }

    let module_table = &self.link_output.module_table;
    for chunk in chunk_graph.chunk_table.iter_mut() {
      // An entry chunk without modules re-exports its entry from a common chunk.
      let first_module = chunk.modules.first().copied().or(chunk.entry_module_idx());
      chunk.exec_order = first_module.map_or(u32::MAX, |idx| module_table[idx].exec_order());
    }

    let mut sorted_chunk_idx_vec = chunk_graph.chunk_table.indices().collect::<Vec<_>>();
    sorted_chunk_idx_vec.sort_by_key(|idx| chunk_graph.chunk_table[*idx].exec_order);
    chunk_graph.sorted_chunk_idx_vec = sorted_chunk_idx_vec;

    chunk_graph
  }

  fn determine_reachable_modules_for_entry(
    &self,
    entry: ModuleIdx,
    bit: u32,
    module_to_bits: &mut IndexVec<ModuleIdx, BitSet>,
  ) {
    let mut stack = vec![entry];
    while let Some(module_idx) = stack.pop() {
      if module_to_bits[module_idx].has_bit(bit) {
        continue;
      }
      module_to_bits[module_idx].set_bit(bit);
      stack.extend(self.link_output.metadata[module_idx].dependencies.iter().copied());
    }
  }
}

