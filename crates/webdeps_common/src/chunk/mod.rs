pub mod types;

use arcstr::ArcStr;
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;
use webdeps_utils::{
  bitset::BitSet, hash_placeholder::HashPlaceholderGenerator, indexmap::FxIndexSet, rstr::Rstr,
};

use crate::{ChunkIdx, ChunkKind, ModuleIdx, SymbolRef};

use self::types::{
  cross_chunk_import_item::CrossChunkImportItem, preliminary_filename::PreliminaryFilename,
};

/// Entry chunks of packages land at the root of the output directory, everything else under this directory.
pub const COMMON_DIR: &str = "common";

pub type ChunkTable = IndexVec<ChunkIdx, Chunk>;

#[derive(Debug, Default)]
pub struct Chunk {
  pub exec_order: u32,
  pub kind: ChunkKind,
  /// Sorted by execution order.
  pub modules: Vec<ModuleIdx>,
  pub name: ArcStr,
  pub preliminary_filename: Option<PreliminaryFilename>,
  pub canonical_names: FxHashMap<SymbolRef, Rstr>,
  // Sorted by exec order of the importee chunk
  pub cross_chunk_imports: Vec<ChunkIdx>,
  pub cross_chunk_dynamic_imports: Vec<ChunkIdx>,
  pub bits: BitSet,
  pub imports_from_other_chunks: Vec<(ChunkIdx, Vec<CrossChunkImportItem>)>,
  /// External modules imported by modules of this chunk, with the facade symbols used from each of them.
  pub imports_from_external_modules: Vec<(ModuleIdx, Vec<SymbolRef>)>,
  /// Symbols other chunks import from this one. They are exported under their name in this chunk.
  pub exports_to_other_chunks: FxIndexSet<SymbolRef>,
  /// `export { <symbol> as <name> }` of an entry chunk.
  pub entry_exports: Vec<(Rstr, SymbolRef)>,
}

impl Chunk {
  pub fn new(name: ArcStr, bits: BitSet, modules: Vec<ModuleIdx>, kind: ChunkKind) -> Self {
    Self { exec_order: u32::MAX, modules, name, bits, kind, ..Self::default() }
  }

  pub fn entry_module_idx(&self) -> Option<ModuleIdx> {
    match &self.kind {
      ChunkKind::EntryPoint { module, .. } => Some(*module),
      ChunkKind::Common => None,
    }
  }

  pub fn is_user_defined_entry(&self) -> bool {
    matches!(self.kind, ChunkKind::EntryPoint { is_user_defined: true, .. })
  }

  /// Package entries are named after the package at the root. Every other chunk is fingerprinted and lives in
  /// [`COMMON_DIR`].
  pub fn generate_preliminary_filename(
    &self,
    hash_placeholder_generator: &mut HashPlaceholderGenerator,
  ) -> PreliminaryFilename {
    if self.is_user_defined_entry() {
      return PreliminaryFilename::new(format!("{}.js", self.name), None);
    }
    let placeholder = hash_placeholder_generator.generate(8);
    let filename = format!("{COMMON_DIR}/{}-{placeholder}.js", self.name);
    PreliminaryFilename::new(filename, Some(vec![placeholder]))
  }

  pub fn name_of(&self, symbol: SymbolRef) -> Option<&str> {
    self.canonical_names.get(&symbol).map(Rstr::as_str)
  }
}

#[test]
fn test_preliminary_filenames() {
  let mut generator = HashPlaceholderGenerator::default();
  let entry = Chunk::new(
    "@scope--pkg".into(),
    BitSet::new(1),
    vec![],
    ChunkKind::EntryPoint { is_user_defined: true, bit: 0, module: ModuleIdx::from_usize(0) },
  );
  assert_eq!(entry.generate_preliminary_filename(&mut generator).as_str(), "@scope--pkg.js");

  let common = Chunk::new("shared".into(), BitSet::new(1), vec![], ChunkKind::Common);
  let filename = common.generate_preliminary_filename(&mut generator);
  assert_eq!(filename.as_str(), "common/shared-!~{000}~.js");
  assert_eq!(filename.hash_placeholder(), Some(&["!~{000}~".to_string()][..]));
}
