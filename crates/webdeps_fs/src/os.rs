use std::{fs, io, path::Path};

use crate::FileSystem;

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    fs::write(path, content)
  }

  fn is_dir(&self, path: &Path) -> bool {
    path.is_dir()
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
  }

  fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
      Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
      other => other,
    }
  }

  fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn remove_missing_dir_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let fs = OsFileSystem;
    assert!(fs.remove_dir_all(&dir.path().join("missing")).is_ok());
  }

  #[test]
  fn write_then_rename() {
    let dir = tempfile::tempdir().unwrap();
    let fs = OsFileSystem;
    let staging = dir.path().join(".out.staging");
    fs.create_dir_all(&staging.join("common")).unwrap();
    fs.write(&staging.join("common").join("a.js"), b"export {};").unwrap();
    fs.rename(&staging, &dir.path().join("out")).unwrap();
    assert!(fs.is_dir(&dir.path().join("out")));
    assert!(!staging.exists());
    assert_eq!(fs.read_to_string(&dir.path().join("out/common/a.js")).unwrap(), "export {};");
  }
}
