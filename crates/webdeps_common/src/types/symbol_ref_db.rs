use std::ops::{Index, IndexMut};

use oxc_index::IndexVec;
use webdeps_utils::rstr::Rstr;

use crate::{ModuleIdx, SymbolIdx, SymbolRef};

#[derive(Debug, Clone)]
pub struct SymbolRefData {
  /// The name the symbol is declared with. The rendered name is decided per chunk.
  pub name: Rstr,
  /// The symbol that this symbol is linked to.
  pub link: Option<SymbolRef>,
}

/// Top-level symbols of one module: its root bindings followed by the facade symbols created for it.
#[derive(Debug)]
pub struct SymbolRefDbForModule {
  pub owner: ModuleIdx,
  symbols: IndexVec<SymbolIdx, SymbolRefData>,
}

impl SymbolRefDbForModule {
  pub fn new(owner: ModuleIdx) -> Self {
    Self { owner, symbols: IndexVec::new() }
  }

  /// A top-level binding declared in the source.
  pub fn create_root_symbol_ref(&mut self, name: &str) -> SymbolRef {
    let symbol = self.symbols.push(SymbolRefData { name: Rstr::new(name), link: None });
    SymbolRef::from((self.owner, symbol))
  }

  // The `facade` means the symbol doesn't come from a declaration in the source.
  pub fn create_facade_root_symbol_ref(&mut self, name: &str) -> SymbolRef {
    self.create_root_symbol_ref(name)
  }

  pub fn len(&self) -> usize {
    self.symbols.len()
  }

  pub fn is_empty(&self) -> bool {
    self.symbols.is_empty()
  }

  pub fn symbol_name(&self, symbol: SymbolIdx) -> &str {
    self.symbols[symbol].name.as_str()
  }
}

// Information about symbols for all modules
#[derive(Debug, Default)]
pub struct SymbolRefDb {
  inner: IndexVec<ModuleIdx, SymbolRefDbForModule>,
}

impl Index<ModuleIdx> for SymbolRefDb {
  type Output = SymbolRefDbForModule;

  fn index(&self, index: ModuleIdx) -> &Self::Output {
    &self.inner[index]
  }
}

impl IndexMut<ModuleIdx> for SymbolRefDb {
  fn index_mut(&mut self, index: ModuleIdx) -> &mut Self::Output {
    &mut self.inner[index]
  }
}

impl SymbolRefDb {
  fn ensure_exact_capacity(&mut self, module_idx: ModuleIdx) {
    let new_len = module_idx.index() + 1;
    while self.inner.len() < new_len {
      let owner = ModuleIdx::from_usize(self.inner.len());
      self.inner.push(SymbolRefDbForModule::new(owner));
    }
  }

  pub fn store_local_db(&mut self, idx: ModuleIdx, local_db: SymbolRefDbForModule) {
    self.ensure_exact_capacity(idx);
    self.inner[idx] = local_db;
  }

  pub fn create_facade_root_symbol_ref(&mut self, owner: ModuleIdx, name: &str) -> SymbolRef {
    self.ensure_exact_capacity(owner);
    self.inner[owner].create_facade_root_symbol_ref(name)
  }

  /// Make `base` point to `target`
  pub fn link(&mut self, base: SymbolRef, target: SymbolRef) {
    let base_root = self.find_mut(base);
    let target_root = self.find_mut(target);
    if base_root == target_root {
      // already linked
      return;
    }
    self.get_mut(base_root).link = Some(target_root);
  }

  pub fn get(&self, refer: SymbolRef) -> &SymbolRefData {
    &self.inner[refer.owner].symbols[refer.symbol]
  }

  pub fn get_mut(&mut self, refer: SymbolRef) -> &mut SymbolRefData {
    &mut self.inner[refer.owner].symbols[refer.symbol]
  }

  /// <https://en.wikipedia.org/wiki/Disjoint-set_data_structure>
  /// See Path halving
  pub fn find_mut(&mut self, target: SymbolRef) -> SymbolRef {
    let mut canonical = target;
    while let Some(parent) = self.get(canonical).link {
      let grandparent = self.get(parent).link;
      self.get_mut(canonical).link = grandparent.or(Some(parent));
      canonical = parent;
    }
    canonical
  }

  // Used for the situation where rust require `&self`
  pub fn canonical_ref_for(&self, target: SymbolRef) -> SymbolRef {
    let mut canonical = target;
    while let Some(founded) = self.get(canonical).link {
      debug_assert!(founded != target);
      canonical = founded;
    }
    canonical
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn links_are_transitive() {
    let mut db = SymbolRefDb::default();
    let a = db.create_facade_root_symbol_ref(ModuleIdx::from_usize(0), "a");
    let b = db.create_facade_root_symbol_ref(ModuleIdx::from_usize(1), "b");
    let c = db.create_facade_root_symbol_ref(ModuleIdx::from_usize(2), "c");

    db.link(a, b);
    db.link(b, c);
    assert_eq!(db.canonical_ref_for(a), c);
    assert_eq!(a.canonical_ref(&db).name(&db), "c");

    // Linking twice is a no-op.
    db.link(a, c);
    assert_eq!(db.find_mut(a), c);
    assert_eq!(db.get(c).link, None);
  }
}
