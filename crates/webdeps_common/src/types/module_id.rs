use std::path::Path;

use arcstr::ArcStr;
use sugar_path::SugarPath;

/// `ModuleId` is the unique string identifier for each module: the absolute path for files, a `\0`-prefixed name
/// for virtual modules and the bare specifier for external ones.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  pub fn is_virtual(&self) -> bool {
    self.0.starts_with('\0')
  }

  /// A cwd-independent representation, used in region markers, error messages and as the ordering key.
  pub fn stabilize(&self, cwd: &Path) -> String {
    if let Some(virtual_id) = self.0.strip_prefix('\0') {
      return virtual_id.to_string();
    }
    if self.as_path().is_absolute() {
      self.relative(cwd).as_path().to_slash_lossy().into_owned()
    } else {
      self.to_string()
    }
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl std::fmt::Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

#[test]
fn test_stabilize() {
  let cwd = Path::new("/project");
  assert_eq!(
    ModuleId::new("/project/node_modules/pkg/index.mjs").stabilize(cwd),
    "node_modules/pkg/index.mjs"
  );
  assert_eq!(ModuleId::new("\0webdeps:runtime").stabilize(cwd), "webdeps:runtime");
  assert_eq!(ModuleId::new("fs").stabilize(cwd), "fs");
}
