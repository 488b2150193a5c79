use webdeps_common::Chunk;

use crate::{link_stage::LinkStageOutput, utils::renamer::Renamer};

pub fn deconflict_chunk_symbols(chunk: &mut Chunk, link_output: &LinkStageOutput) {
  let mut renamer = Renamer::new(&link_output.symbols);

  // Nested bindings and globals of every module keep their spelling, top-level symbols move around them.
  chunk
    .modules
    .iter()
    .filter_map(|idx| link_output.module_table[*idx].as_normal())
    .flat_map(|module| module.reserved_names.iter())
    .for_each(|name| renamer.reserve(name.clone()));

  // Symbols imported from other chunks behave like declarations of this chunk once the import statements are
  // rendered, so they compete for the same names.
  chunk.imports_from_other_chunks.iter().flat_map(|(_, items)| items.iter()).for_each(|item| {
    renamer.add_symbol_in_root_scope(item.import_ref);
  });

  chunk.imports_from_external_modules.iter().flat_map(|(_, symbols)| symbols.iter()).for_each(
    |symbol_ref| {
      renamer.add_symbol_in_root_scope(*symbol_ref);
    },
  );

  chunk
    .modules
    .iter()
    .copied()
    // Starts with entry module
    .rev()
    .flat_map(|idx| link_output.metadata[idx].declared_symbols.iter().copied())
    .for_each(|symbol_ref| {
      renamer.add_symbol_in_root_scope(symbol_ref);
    });

  chunk.canonical_names = renamer.into_canonical_names();
}
