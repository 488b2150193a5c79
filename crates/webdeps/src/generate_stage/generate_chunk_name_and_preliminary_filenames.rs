use arcstr::ArcStr;
use webdeps_common::{ChunkKind, ModuleIdx};
use webdeps_utils::{
  hash_placeholder::HashPlaceholderGenerator, sanitize_file_name::sanitize_file_name,
};

use crate::graph::ChunkGraph;

use super::GenerateStage;

impl GenerateStage<'_> {
  /// Notices:
  /// - Should generate filenames that are stable cross builds and os.
  pub fn generate_chunk_name_and_preliminary_filenames(&self, chunk_graph: &mut ChunkGraph) {
    let module_table = &self.link_output.module_table;
    let runtime_idx = self.link_output.runtime.id();
    let name_of_module = |idx: ModuleIdx| {
      module_table[idx]
        .as_normal()
        .map_or(arcstr::literal!("chunk"), |module| ArcStr::from(sanitize_file_name(&module.repr_name)))
    };

    let mut hash_placeholder_generator = HashPlaceholderGenerator::default();
    for chunk_idx in &chunk_graph.sorted_chunk_idx_vec {
      let chunk = &mut chunk_graph.chunk_table[*chunk_idx];
      if chunk.name.is_empty() {
        chunk.name = match chunk.kind {
          ChunkKind::EntryPoint { module, .. } => name_of_module(module),
          // The last executed module is usually the one the others were pulled in for.
          ChunkKind::Common => chunk
            .modules
            .iter()
            .rev()
            .find(|idx| **idx != runtime_idx)
            .map_or(arcstr::literal!("chunk"), |idx| name_of_module(*idx)),
        };
      }
      chunk.preliminary_filename =
        Some(chunk.generate_preliminary_filename(&mut hash_placeholder_generator));
    }
  }
}
