use std::hash::Hash;

use itertools::Itertools;
use oxc_index::{index_vec, IndexVec};
use rustc_hash::FxHashMap;
use webdeps_common::{AssetIdx, ChunkIdx, OutputChunk};
use webdeps_utils::{
  hash_placeholder::{extract_hash_placeholders, replace_placeholder_with_hash},
  indexmap::FxIndexSet,
  rayon::{IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator, ParallelIterator},
  xxhash::{base64_url, xxhash_base64_url},
};
use xxhash_rust::xxh3::Xxh3;

use crate::{graph::ChunkGraph, link_stage::LinkStageOutput, types::IndexInstantiatedChunks};

/// Replaces hash placeholders with content hashes. The hash of a chunk covers its own content and the content of
/// every chunk it imports, directly or not, so a change anywhere below a chunk renames it too.
pub fn finalize_chunks(
  instantiated_chunks: IndexInstantiatedChunks,
  chunk_graph: &ChunkGraph,
  link_output: &LinkStageOutput,
) -> Vec<OutputChunk> {
  let asset_idx_by_placeholder = instantiated_chunks
    .iter_enumerated()
    .filter_map(|(asset_idx, asset)| {
      asset.preliminary_filename.hash_placeholder().map(move |placeholders| {
        placeholders.iter().map(move |hash_placeholder| (hash_placeholder.as_str(), asset_idx))
      })
    })
    .flatten()
    .collect::<FxHashMap<_, _>>();

  let index_direct_dependencies: IndexVec<AssetIdx, Vec<AssetIdx>> = instantiated_chunks
    .par_iter()
    .map(|asset| {
      extract_hash_placeholders(&asset.content)
        .iter()
        .filter_map(|placeholder| asset_idx_by_placeholder.get(placeholder).copied())
        .unique()
        .collect_vec()
    })
    .collect::<Vec<_>>()
    .into();

  let index_transitive_dependencies = collect_transitive_dependencies(&index_direct_dependencies);

  let index_standalone_content_hashes: IndexVec<AssetIdx, String> = instantiated_chunks
    .par_iter()
    .map(|chunk| xxhash_base64_url(chunk.content.as_bytes()))
    .collect::<Vec<_>>()
    .into();

  let index_asset_hashers: IndexVec<AssetIdx, Xxh3> =
    index_vec![Xxh3::default(); instantiated_chunks.len()];

  let index_final_hashes: IndexVec<AssetIdx, String> = index_asset_hashers
    .into_par_iter()
    .enumerate()
    .map(|(asset_idx, mut hasher)| {
      let asset_idx = AssetIdx::from(asset_idx);
      index_standalone_content_hashes[asset_idx].hash(&mut hasher);
      // Chunks with the same content still get different hashes.
      instantiated_chunks[asset_idx].preliminary_filename.hash(&mut hasher);
      index_transitive_dependencies[asset_idx].iter().for_each(|dep_idx| {
        index_standalone_content_hashes[*dep_idx].hash(&mut hasher);
      });
      base64_url(&hasher.digest128().to_le_bytes())
    })
    .collect::<Vec<_>>()
    .into();

  let final_hashes_by_placeholder = index_final_hashes
    .iter_enumerated()
    .filter_map(|(idx, hash)| {
      instantiated_chunks[idx].preliminary_filename.hash_placeholder().map(|placeholders| {
        placeholders.iter().map(|placeholder| (placeholder.clone(), &hash[..placeholder.len()]))
      })
    })
    .flatten()
    .collect::<FxHashMap<_, _>>();

  let filenames = instantiated_chunks
    .iter()
    .map(|asset| {
      let filename =
        replace_placeholder_with_hash(asset.preliminary_filename.as_str(), &final_hashes_by_placeholder);
      (asset.originate_from, filename.into_owned())
    })
    .collect::<FxHashMap<ChunkIdx, String>>();

  instantiated_chunks
    .into_par_iter()
    .map(|asset| {
      let chunk = &chunk_graph.chunk_table[asset.originate_from];
      let filename = filenames[&asset.originate_from].clone();
      let code = replace_placeholder_with_hash(&asset.content, &final_hashes_by_placeholder).into_owned();
      let map = asset.map.map(|mut map| {
        map.set_file(filename.rsplit('/').next().unwrap_or(&filename));
        map.to_json_string()
      });
      OutputChunk {
        name: chunk.name.clone(),
        is_entry: chunk.is_user_defined_entry(),
        exports: chunk.entry_exports.iter().map(|(name, _)| name.clone()).collect(),
        modules: chunk
          .modules
          .iter()
          .map(|idx| link_output.module_table[*idx].stable_id().to_string())
          .collect(),
        imports: chunk.cross_chunk_imports.iter().map(|idx| filenames[idx].clone()).collect(),
        filename,
        code,
        map,
      }
    })
    .collect::<Vec<_>>()
}

fn collect_transitive_dependencies(
  index_direct_dependencies: &IndexVec<AssetIdx, Vec<AssetIdx>>,
) -> IndexVec<AssetIdx, FxIndexSet<AssetIdx>> {
  fn traverse(
    index: AssetIdx,
    dep_map: &IndexVec<AssetIdx, Vec<AssetIdx>>,
    visited: &mut FxIndexSet<AssetIdx>,
  ) {
    for dep_index in &dep_map[index] {
      if visited.insert(*dep_index) {
        traverse(*dep_index, dep_map, visited);
      }
    }
  }

  index_direct_dependencies
    .par_iter()
    .enumerate()
    .map(|(idx, _deps)| {
      let idx = AssetIdx::from(idx);
      let mut visited_deps = FxIndexSet::default();
      traverse(idx, index_direct_dependencies, &mut visited_deps);
      visited_deps
    })
    .collect::<Vec<_>>()
    .into()
}

#[cfg(test)]
mod tests {
  use oxc_index::IndexVec;

  use super::*;

  #[test]
  fn dependencies_are_collected_transitively() {
    // 0 -> 1 -> 2 -> 1
    let direct: IndexVec<AssetIdx, Vec<AssetIdx>> =
      vec![vec![AssetIdx::from(1)], vec![AssetIdx::from(2)], vec![AssetIdx::from(1)]].into();
    let transitive = collect_transitive_dependencies(&direct);
    assert_eq!(transitive[AssetIdx::from(0)].iter().map(|idx| idx.index()).collect_vec(), [1, 2]);
    assert_eq!(transitive[AssetIdx::from(2)].iter().map(|idx| idx.index()).collect_vec(), [1, 2]);
  }
}
