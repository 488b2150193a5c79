use std::fmt::Debug;

use oxc::span::Span;
use webdeps_utils::rstr::Rstr;

use crate::{ImportKind, ModuleIdx};

pub type RawImportRecord = ImportRecord<Span>;
pub type ResolvedImportRecord = ImportRecord<ModuleIdx>;

bitflags::bitflags! {
  #[derive(Debug, Clone, Copy, Default)]
  pub struct ImportRecordMeta: u8 {
    /// `import '...'` or `import {} from '...'`
    const IS_PLAIN_IMPORT = 1;
    /// `export * from 'mod'` only
    const IS_EXPORT_STAR = 1 << 1;
    /// Inserted to satisfy a shimmed global such as `process`; there is no such import in the source.
    const IS_SHIM_IMPORT = 1 << 2;
  }
}

#[derive(Debug)]
pub struct ImportRecord<State: Debug> {
  pub state: State,
  /// `./lib.js` in `import { foo } from './lib.js';`
  pub specifier: Rstr,
  pub kind: ImportKind,
  pub meta: ImportRecordMeta,
}

impl RawImportRecord {
  pub fn new(specifier: Rstr, kind: ImportKind, span: Span) -> Self {
    Self { specifier, kind, meta: ImportRecordMeta::empty(), state: span }
  }

  #[must_use]
  pub fn with_meta(mut self, meta: ImportRecordMeta) -> Self {
    self.meta = meta;
    self
  }

  pub fn into_resolved(self, resolved_module: ModuleIdx) -> ResolvedImportRecord {
    ResolvedImportRecord {
      state: resolved_module,
      specifier: self.specifier,
      kind: self.kind,
      meta: self.meta,
    }
  }
}

impl ResolvedImportRecord {
  pub fn resolved_module(&self) -> ModuleIdx {
    self.state
  }
}
