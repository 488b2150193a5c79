use std::{borrow::Cow, ffi::OsStr};

use sugar_path::SugarPath;

pub trait PathExt {
  fn expect_to_slash(&self) -> String;

  fn representative_file_name(&self) -> Cow<str>;
}

impl PathExt for std::path::Path {
  fn expect_to_slash(&self) -> String {
    self.to_slash().map_or_else(|| self.to_string_lossy().replace('\\', "/"), Cow::into_owned)
  }

  /// It doesn't ensure the file name is a valid identifier in JS.
  fn representative_file_name(&self) -> Cow<str> {
    let file_name =
      self.file_stem().map_or_else(|| self.to_string_lossy(), |stem| stem.to_string_lossy());

    match &*file_name {
      // Node.js resolves a directory import to its `index` file.
      "index" => self
        .parent()
        .and_then(Self::file_stem)
        .map(OsStr::to_string_lossy)
        .map_or(file_name, |parent_dir_name| parent_dir_name),
      _ => file_name,
    }
  }
}

#[test]
fn test_representative_file_name() {
  use std::path::Path;

  let cwd = Path::new(".").join("project");
  let path = cwd.join("node_modules").join("preact").join("dist").join("preact.mjs");
  assert_eq!(path.representative_file_name(), "preact");

  let path = cwd.join("node_modules").join("vue").join("index.js");
  assert_eq!(path.representative_file_name(), "vue");
}
