use itertools::Itertools;
use oxc_index::{index_vec, IndexVec};
use rustc_hash::FxHashMap;
use webdeps_common::{
  ChunkIdx, ChunkKind, CrossChunkImportItem, ImportKind, Module, ModuleIdx, SymbolRef,
};
use webdeps_utils::{
  indexmap::{FxIndexMap, FxIndexSet},
  rstr::Rstr,
};

use crate::graph::ChunkGraph;

use super::GenerateStage;

type IndexChunkDependedSymbols = IndexVec<ChunkIdx, FxIndexSet<SymbolRef>>;
type IndexChunkImportsFromExternalModules =
  IndexVec<ChunkIdx, FxIndexMap<ModuleIdx, FxIndexSet<SymbolRef>>>;
type IndexCrossChunkDynamicImports = IndexVec<ChunkIdx, FxIndexSet<ChunkIdx>>;

impl GenerateStage<'_> {
  pub fn compute_cross_chunk_links(&self, chunk_graph: &mut ChunkGraph) {
    let chunks_len = chunk_graph.chunk_table.len();
    let mut chunk_depended_symbols = index_vec![FxIndexSet::default(); chunks_len];
    let mut chunk_imports_from_external_modules = index_vec![FxIndexMap::default(); chunks_len];
    let mut cross_chunk_dynamic_imports = index_vec![FxIndexSet::default(); chunks_len];

    let symbol_to_chunk = self.collect_depended_symbols(
      chunk_graph,
      &mut chunk_depended_symbols,
      &mut chunk_imports_from_external_modules,
      &mut cross_chunk_dynamic_imports,
    );

    let mut cross_chunk_imports = index_vec![FxIndexSet::<ChunkIdx>::default(); chunks_len];
    let mut imports_from_other_chunks =
      index_vec![FxIndexMap::<ChunkIdx, Vec<SymbolRef>>::default(); chunks_len];
    let mut exports_to_other_chunks = index_vec![FxIndexSet::<SymbolRef>::default(); chunks_len];

    for (chunk_idx, depended_symbols) in chunk_depended_symbols.iter_enumerated() {
      for symbol in depended_symbols {
        if self.link_output.module_table[symbol.owner].is_external() {
          chunk_imports_from_external_modules[chunk_idx].entry(symbol.owner).or_default().insert(*symbol);
          continue;
        }
        let Some(importee_chunk_idx) = symbol_to_chunk.get(symbol).copied() else {
          tracing::debug!("symbol {:?} is not declared by any chunk", symbol.name(&self.link_output.symbols));
          continue;
        };
        if importee_chunk_idx != chunk_idx {
          cross_chunk_imports[chunk_idx].insert(importee_chunk_idx);
          imports_from_other_chunks[chunk_idx].entry(importee_chunk_idx).or_default().push(*symbol);
          exports_to_other_chunks[importee_chunk_idx].insert(*symbol);
        }
      }

      // Make sure every chunk the entry reaches is evaluated, even the ones nothing is imported from.
      if let ChunkKind::EntryPoint { bit, .. } = &chunk_graph.chunk_table[chunk_idx].kind {
        chunk_graph
          .chunk_table
          .iter_enumerated()
          .filter(|(importee_chunk_idx, importee_chunk)| {
            *importee_chunk_idx != chunk_idx
              && importee_chunk.bits.has_bit(*bit)
              && !importee_chunk.modules.is_empty()
          })
          .for_each(|(importee_chunk_idx, _)| {
            cross_chunk_imports[chunk_idx].insert(importee_chunk_idx);
          });
      }
    }

    let module_table = &self.link_output.module_table;
    for (chunk_idx, chunk) in chunk_graph.chunk_table.iter_mut_enumerated() {
      let exec_order_of = |idx: &ChunkIdx| chunks_exec_order(&chunk_graph.sorted_chunk_idx_vec, *idx);
      chunk.cross_chunk_imports =
        std::mem::take(&mut cross_chunk_imports[chunk_idx]).into_iter().sorted_by_key(exec_order_of).collect();
      let mut imports = std::mem::take(&mut imports_from_other_chunks[chunk_idx]);
      chunk.imports_from_other_chunks = chunk
        .cross_chunk_imports
        .iter()
        .map(|importee_chunk_idx| {
          let items = imports
            .swap_remove(importee_chunk_idx)
            .unwrap_or_default()
            .into_iter()
            .map(|import_ref| CrossChunkImportItem { export_alias: Rstr::default(), import_ref })
            .collect();
          (*importee_chunk_idx, items)
        })
        .collect();
      chunk.imports_from_external_modules = std::mem::take(&mut chunk_imports_from_external_modules[chunk_idx])
        .into_iter()
        .sorted_by_key(|(external_idx, _)| module_table[*external_idx].exec_order())
        .map(|(external_idx, symbols)| (external_idx, symbols.into_iter().collect()))
        .collect();
      chunk.cross_chunk_dynamic_imports =
        std::mem::take(&mut cross_chunk_dynamic_imports[chunk_idx]).into_iter().collect();
      chunk.exports_to_other_chunks = std::mem::take(&mut exports_to_other_chunks[chunk_idx]);
      chunk.entry_exports = chunk
        .entry_module_idx()
        .map(|entry| self.link_output.metadata[entry].entry_exports.clone())
        .unwrap_or_default();
    }
  }

  /// Assigns every declared symbol to the chunk of its module and collects, per chunk, the canonical symbols its
  /// modules refer to.
  fn collect_depended_symbols(
    &self,
    chunk_graph: &ChunkGraph,
    chunk_depended_symbols: &mut IndexChunkDependedSymbols,
    chunk_imports_from_external_modules: &mut IndexChunkImportsFromExternalModules,
    cross_chunk_dynamic_imports: &mut IndexCrossChunkDynamicImports,
  ) -> FxHashMap<SymbolRef, ChunkIdx> {
    let symbols = &self.link_output.symbols;
    let mut symbol_to_chunk = FxHashMap::default();

    for (chunk_idx, chunk) in chunk_graph.chunk_table.iter_enumerated() {
      let depended_symbols = &mut chunk_depended_symbols[chunk_idx];
      for module_idx in chunk.modules.iter().copied() {
        let Module::Normal(module) = &self.link_output.module_table[module_idx] else {
          continue;
        };
        let meta = &self.link_output.metadata[module_idx];
        for declared in &meta.declared_symbols {
          symbol_to_chunk.insert(symbols.canonical_ref_for(*declared), chunk_idx);
        }

        for rec in &module.import_records {
          let importee_idx = rec.resolved_module();
          match &self.link_output.module_table[importee_idx] {
            // Ensure the external module is imported in case it has side effects.
            Module::External(_) if rec.kind.is_static() => {
              chunk_imports_from_external_modules[chunk_idx].entry(importee_idx).or_default();
            }
            Module::Normal(_) if matches!(rec.kind, ImportKind::DynamicImport) => {
              if let Some(importee_chunk) = chunk_graph.entry_module_to_entry_chunk.get(&importee_idx) {
                cross_chunk_dynamic_imports[chunk_idx].insert(*importee_chunk);
              }
            }
            _ => {}
          }
        }

        depended_symbols
          .extend(meta.referenced_symbols.iter().map(|symbol| symbols.canonical_ref_for(*symbol)));
      }

      if let Some(entry) = chunk.entry_module_idx() {
        depended_symbols.extend(
          self.link_output.metadata[entry]
            .entry_exports
            .iter()
            .map(|(_, symbol)| symbols.canonical_ref_for(*symbol)),
        );
      }
    }

    symbol_to_chunk
  }

  /// An importing chunk names imported symbols the way the importee chunk declares them.
  pub fn assign_cross_chunk_export_aliases(chunk_graph: &mut ChunkGraph) {
    let aliases = chunk_graph
      .chunk_table
      .iter()
      .map(|chunk| {
        chunk
          .imports_from_other_chunks
          .iter()
          .map(|(importee_chunk_idx, items)| {
            let importee_chunk = &chunk_graph.chunk_table[*importee_chunk_idx];
            items
              .iter()
              .map(|item| importee_chunk.canonical_names.get(&item.import_ref).cloned().unwrap_or_default())
              .collect::<Vec<_>>()
          })
          .collect::<Vec<_>>()
      })
      .collect::<Vec<_>>();

    for (chunk, aliases) in chunk_graph.chunk_table.iter_mut().zip(aliases) {
      for ((_, items), aliases) in chunk.imports_from_other_chunks.iter_mut().zip(aliases) {
        for (item, alias) in items.iter_mut().zip(aliases) {
          item.export_alias = alias;
        }
      }
    }
  }
}

fn chunks_exec_order(sorted_chunk_idx_vec: &[ChunkIdx], chunk_idx: ChunkIdx) -> usize {
  sorted_chunk_idx_vec.iter().position(|idx| *idx == chunk_idx).unwrap_or(usize::MAX)
}
