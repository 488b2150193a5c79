use std::collections::hash_map::Entry;

use oxc::syntax::keyword::{GLOBAL_OBJECTS, RESERVED_KEYWORDS};
use rustc_hash::{FxHashMap, FxHashSet};
use webdeps_common::{SymbolRef, SymbolRefDb};
use webdeps_utils::{
  concat_string,
  rstr::{Rstr, ToRstr},
};

/// Gives every top-level symbol of a chunk a name that is unique inside the chunk.
#[derive(Debug)]
pub struct Renamer<'name> {
  // Maps base names to the last suffix tried (`a` -> 0 means `a` is taken, `a$1` is next).
  used_canonical_names: FxHashMap<Rstr, u32>,
  // Every name handed out or reserved, including suffixed ones.
  used_names: FxHashSet<Rstr>,
  canonical_names: FxHashMap<SymbolRef, Rstr>,
  symbol_db: &'name SymbolRefDb,
}

impl<'name> Renamer<'name> {
  pub fn new(symbol_db: &'name SymbolRefDb) -> Self {
    let mut renamer = Self {
      used_canonical_names: FxHashMap::default(),
      used_names: FxHashSet::default(),
      canonical_names: FxHashMap::default(),
      symbol_db,
    };
    // Names CommonJS code reads from its wrapper or from the host.
    ["exports", "module", "require", "Object", "Promise"]
      .iter()
      .chain(RESERVED_KEYWORDS.iter())
      .chain(GLOBAL_OBJECTS.iter())
      .for_each(|name| renamer.reserve(Rstr::new(name)));
    renamer
  }

  /// Keeps `name` away from every symbol added afterwards.
  pub fn reserve(&mut self, name: Rstr) {
    self.used_canonical_names.entry(name.clone()).or_insert(0);
    self.used_names.insert(name);
  }

  pub fn add_symbol_in_root_scope(&mut self, symbol_ref: SymbolRef) {
    let canonical_ref = symbol_ref.canonical_ref(self.symbol_db);
    if self.canonical_names.contains_key(&canonical_ref) {
      return;
    }
    let original_name = canonical_ref.name(self.symbol_db);

    let (mut candidate_name, count) = match self.used_canonical_names.entry(original_name.to_rstr()) {
      Entry::Occupied(o) => {
        let count = o.into_mut();
        *count += 1;
        (Self::generate_candidate_name(original_name, *count), count)
      }
      Entry::Vacant(v) => (original_name.to_rstr(), v.insert(0)),
    };

    while self.used_names.contains(&candidate_name) {
      *count += 1;
      candidate_name = Self::generate_candidate_name(original_name, *count);
    }

    self.used_names.insert(candidate_name.clone());
    self.canonical_names.insert(canonical_ref, candidate_name);
  }

  pub fn into_canonical_names(self) -> FxHashMap<SymbolRef, Rstr> {
    self.canonical_names
  }

  fn generate_candidate_name(original_name: &str, count: u32) -> Rstr {
    concat_string!(original_name, "$", itoa::Buffer::new().format(count)).into()
  }
}

#[cfg(test)]
mod tests {
  use webdeps_common::ModuleIdx;

  use super::*;

  #[test]
  fn deconflicts_with_numeric_suffixes() {
    let mut db = SymbolRefDb::default();
    let a = db.create_facade_root_symbol_ref(ModuleIdx::from_usize(0), "foo");
    let b = db.create_facade_root_symbol_ref(ModuleIdx::from_usize(1), "foo");
    let c = db.create_facade_root_symbol_ref(ModuleIdx::from_usize(2), "foo$1");
    let d = db.create_facade_root_symbol_ref(ModuleIdx::from_usize(2), "Object");
    let e = db.create_facade_root_symbol_ref(ModuleIdx::from_usize(2), "bar");

    let mut renamer = Renamer::new(&db);
    renamer.reserve("bar".into());
    for symbol in [a, b, c, d, e] {
      renamer.add_symbol_in_root_scope(symbol);
    }
    let names = renamer.into_canonical_names();
    assert_eq!(names[&a].as_str(), "foo");
    assert_eq!(names[&b].as_str(), "foo$1");
    assert_eq!(names[&c].as_str(), "foo$1$1");
    assert_eq!(names[&d].as_str(), "Object$1");
    assert_eq!(names[&e].as_str(), "bar$1");
  }

  #[test]
  fn linked_symbols_share_one_name() {
    let mut db = SymbolRefDb::default();
    let local = db.create_facade_root_symbol_ref(ModuleIdx::from_usize(0), "x");
    let imported = db.create_facade_root_symbol_ref(ModuleIdx::from_usize(1), "y");
    db.link(imported, local);

    let mut renamer = Renamer::new(&db);
    renamer.add_symbol_in_root_scope(imported);
    renamer.add_symbol_in_root_scope(local);
    let names = renamer.into_canonical_names();
    assert_eq!(names.len(), 1);
    assert_eq!(names[&local].as_str(), "x");
  }
}
