use rustc_hash::FxHashMap;
use webdeps_utils::rstr::Rstr;

use crate::{ModuleIdx, NormalModule, SymbolRef};

pub static RUNTIME_MODULE_ID: &str = "\0webdeps:runtime";

/// The exported helpers of the runtime module, looked up by name while linking.
#[derive(Debug)]
pub struct RuntimeModuleBrief {
  idx: ModuleIdx,
  name_to_symbol: FxHashMap<Rstr, SymbolRef>,
}

impl RuntimeModuleBrief {
  pub fn new(module: &NormalModule) -> Self {
    let name_to_symbol = module
      .named_exports
      .iter()
      .map(|(name, export)| (name.clone(), export.referenced))
      .collect();

    Self { idx: module.idx, name_to_symbol }
  }

  pub fn id(&self) -> ModuleIdx {
    self.idx
  }

  pub fn resolve_symbol(&self, name: &str) -> SymbolRef {
    self.name_to_symbol[name]
  }
}
