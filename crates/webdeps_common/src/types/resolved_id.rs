use std::path::Path;

use arcstr::ArcStr;

use crate::ModuleId;

#[derive(Debug, Clone)]
pub struct ResolvedId {
  pub id: ArcStr,
  /// Left as an import in the output.
  pub is_external: bool,
}

impl ResolvedId {
  pub fn new(id: impl Into<ArcStr>) -> Self {
    Self { id: id.into(), is_external: false }
  }

  pub fn external(id: impl Into<ArcStr>) -> Self {
    Self { id: id.into(), is_external: true }
  }

  pub fn debug_id(&self, cwd: impl AsRef<Path>) -> String {
    ModuleId::new(ArcStr::clone(&self.id)).stabilize(cwd.as_ref())
  }
}
