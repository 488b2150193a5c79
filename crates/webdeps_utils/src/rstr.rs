use std::{
  borrow::Borrow,
  fmt::{Debug, Display},
  ops::Deref,
};

use arcstr::ArcStr;

/// Cheap-to-clone immutable string used for names that are shared between stages.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rstr(ArcStr);

impl Rstr {
  pub fn new(value: &str) -> Self {
    Self(ArcStr::from(value))
  }

  pub fn as_str(&self) -> &str {
    self.0.as_str()
  }
}

impl Deref for Rstr {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    self.0.as_str()
  }
}

impl AsRef<str> for Rstr {
  fn as_ref(&self) -> &str {
    self.0.as_str()
  }
}

impl Borrow<str> for Rstr {
  fn borrow(&self) -> &str {
    self.0.as_str()
  }
}

impl Display for Rstr {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    Display::fmt(self.0.as_str(), f)
  }
}

impl Debug for Rstr {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    Debug::fmt(self.0.as_str(), f)
  }
}

impl From<&str> for Rstr {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<String> for Rstr {
  fn from(value: String) -> Self {
    Self(ArcStr::from(value))
  }
}

impl From<ArcStr> for Rstr {
  fn from(value: ArcStr) -> Self {
    Self(value)
  }
}

impl From<Rstr> for ArcStr {
  fn from(value: Rstr) -> Self {
    value.0
  }
}

pub trait ToRstr {
  fn to_rstr(&self) -> Rstr;
}

impl ToRstr for str {
  fn to_rstr(&self) -> Rstr {
    Rstr::new(self)
  }
}

impl ToRstr for String {
  fn to_rstr(&self) -> Rstr {
    Rstr::new(self)
  }
}

impl ToRstr for Rstr {
  fn to_rstr(&self) -> Rstr {
    self.clone()
  }
}
