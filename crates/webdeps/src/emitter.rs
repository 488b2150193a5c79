use std::path::{Path, PathBuf};

use webdeps_error::{BuildResult, InstallError};
use webdeps_fs::FileSystem;
use webdeps_utils::concat_string;

use crate::types::{bundle_output::BundleOutput, virtual_entry_map::VirtualEntryMap};

pub const IMPORT_MAP_FILENAME: &str = "import-map.json";

/// Writes the chunks, their source maps and `import-map.json` to `out_root`.
///
/// Everything is written to a staging directory next to `out_root` first. The previous output is only removed
/// once every file has been written, so a failing write leaves it untouched.
pub fn emit(
  fs: &dyn FileSystem,
  output: &BundleOutput,
  entries: &VirtualEntryMap,
  out_root: &Path,
) -> BuildResult<()> {
  let staging = staging_dir(out_root);
  fs.remove_dir_all(&staging).map_err(|err| InstallError::io(&staging, err))?;
  fs.create_dir_all(&staging).map_err(|err| InstallError::io(&staging, err))?;

  for chunk in &output.chunks {
    let path = staging.join(&chunk.filename);
    if let Some(parent) = path.parent() {
      fs.create_dir_all(parent).map_err(|err| InstallError::io(parent, err))?;
    }
    write_file(fs, &path, chunk.code.as_bytes())?;
    if let Some(map) = &chunk.map {
      write_file(fs, &staging.join(chunk.map_filename()), map.as_bytes())?;
    }
  }

  let import_map = render_import_map(output, entries);
  write_file(fs, &staging.join(IMPORT_MAP_FILENAME), import_map.as_bytes())?;

  fs.remove_dir_all(out_root).map_err(|err| InstallError::io(out_root, err))?;
  if let Some(parent) = out_root.parent() {
    fs.create_dir_all(parent).map_err(|err| InstallError::io(parent, err))?;
  }
  fs.rename(&staging, out_root).map_err(|err| InstallError::io(out_root, err))?;

  tracing::debug!("emitted {} chunks to {}", output.chunks.len(), out_root.display());
  Ok(())
}

/// `<parent>/.<name>.staging`
fn staging_dir(out_root: &Path) -> PathBuf {
  let name = out_root.file_name().map_or_else(|| "web_modules".into(), |name| name.to_string_lossy());
  out_root.with_file_name(concat_string!(".", name, ".staging"))
}

fn write_file(fs: &dyn FileSystem, path: &Path, content: &[u8]) -> BuildResult<()> {
  fs.write(path, content).map_err(|err| InstallError::io(path, err))?;
  Ok(())
}

/// `{ "imports": { "<package>": "./<entry file>" } }`
fn render_import_map(output: &BundleOutput, entries: &VirtualEntryMap) -> String {
  let imports = entries
    .iter()
    .filter_map(|(name, entry)| {
      let chunk = output.chunks.iter().find(|chunk| chunk.is_entry && chunk.name.as_str() == name)?;
      Some((entry.package_name.clone(), serde_json::Value::String(concat_string!("./", chunk.filename))))
    })
    .collect::<serde_json::Map<_, _>>();

  let mut json = serde_json::json!({ "imports": imports }).to_string();
  json.push('\n');
  json
}

#[cfg(test)]
mod tests {
  use webdeps_common::OutputChunk;
  use webdeps_fs::OsFileSystem;

  use super::*;
  use crate::types::virtual_entry_map::VirtualEntry;

  fn chunk(name: &str, filename: &str, is_entry: bool) -> OutputChunk {
    OutputChunk {
      name: name.into(),
      filename: filename.to_string(),
      code: concat_string!("// ", filename, "\n"),
      map: Some("{}".to_string()),
      is_entry,
      exports: vec![],
      modules: vec![],
      imports: vec![],
    }
  }

  #[test]
  fn staging_dir_is_a_hidden_sibling() {
    assert_eq!(staging_dir(Path::new("/project/web_modules")), Path::new("/project/.web_modules.staging"));
  }

  #[test]
  fn replaces_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let out_root = dir.path().join("web_modules");
    std::fs::create_dir_all(&out_root).unwrap();
    std::fs::write(out_root.join("stale.js"), "").unwrap();

    let output = BundleOutput {
      chunks: vec![chunk("@scope--pkg", "@scope--pkg.js", true), chunk("shared", "common/shared-abcdefgh.js", false)],
      warnings: vec![],
    };
    let entries = VirtualEntryMap::from_iter([(
      "@scope--pkg".to_string(),
      VirtualEntry { package_name: "@scope/pkg".to_string(), path: PathBuf::from("/unused") },
    )]);
    emit(&OsFileSystem, &output, &entries, &out_root).unwrap();

    assert!(!out_root.join("stale.js").exists());
    assert!(!dir.path().join(".web_modules.staging").exists());
    assert!(out_root.join("common/shared-abcdefgh.js").exists());
    assert!(out_root.join("common/shared-abcdefgh.js.map").exists());
    let import_map = std::fs::read_to_string(out_root.join(IMPORT_MAP_FILENAME)).unwrap();
    assert_eq!(import_map, "{\"imports\":{\"@scope/pkg\":\"./@scope--pkg.js\"}}\n");
  }
}
