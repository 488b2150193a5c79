use webdeps_utils::{indexmap::FxIndexMap, rstr::Rstr};

use crate::{ModuleId, ModuleIdx, SymbolRef};

/// A host built-in left as a bare import because built-in shimming is off.
#[derive(Debug)]
pub struct ExternalModule {
  pub idx: ModuleIdx,
  pub id: ModuleId,
  pub exec_order: u32,
  /// `import * as <namespace_ref> from '<id>'`
  pub namespace_ref: SymbolRef,
  /// `import { <name> as <symbol> } from '<id>'`, created while linking.
  pub named_imports: FxIndexMap<Rstr, SymbolRef>,
}

impl ExternalModule {
  pub fn new(idx: ModuleIdx, id: ModuleId, namespace_ref: SymbolRef) -> Self {
    Self { idx, id, exec_order: u32::MAX, namespace_ref, named_imports: FxIndexMap::default() }
  }
}
