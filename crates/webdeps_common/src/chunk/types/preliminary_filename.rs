use std::ops::Deref;

/// A filename that may still contain hash placeholders.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct PreliminaryFilename {
  filename: String,
  hash_placeholder: Option<Vec<String>>,
}

impl PreliminaryFilename {
  pub fn new(filename: String, hash_placeholder: Option<Vec<String>>) -> Self {
    Self { filename, hash_placeholder }
  }

  pub fn hash_placeholder(&self) -> Option<&[String]> {
    self.hash_placeholder.as_deref()
  }

  pub fn as_str(&self) -> &str {
    &self.filename
  }
}

impl Deref for PreliminaryFilename {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.filename
  }
}
