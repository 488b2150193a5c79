use std::path::Path;

use arcstr::ArcStr;
use webdeps_common::{ModuleType, RUNTIME_MODULE_ID};
use webdeps_error::InstallError;
use webdeps_fs::FileSystem;
use webdeps_utils::concat_string;

use crate::{
  polyfills::{polyfill_source, EMPTY_MODULE_PREFIX, POLYFILL_PREFIX},
  scan_stage::ast_scanner::FormatHint,
};

const EMPTY_MODULE_SOURCE: &str = "module.exports = {};\n";

pub struct LoadedSource {
  pub source: ArcStr,
  pub module_type: ModuleType,
  pub hint: FormatHint,
}

/// Reads the text of a module. JSON documents are turned into a CommonJS module exporting the document.
pub fn load_source(fs: &dyn FileSystem, id: &str, stable_id: &str) -> Result<LoadedSource, InstallError> {
  if id == RUNTIME_MODULE_ID {
    return Ok(LoadedSource {
      source: arcstr::literal!(include_str!("../runtime/runtime.js")),
      module_type: ModuleType::Virtual,
      hint: FormatHint::Esm,
    });
  }

  if let Some(name) = id.strip_prefix(POLYFILL_PREFIX) {
    if let Some(source) = polyfill_source(name) {
      return Ok(LoadedSource {
        source: ArcStr::from(source),
        module_type: ModuleType::Virtual,
        hint: FormatHint::CommonJs,
      });
    }
  }

  if id.starts_with('\0') {
    debug_assert!(id.starts_with(EMPTY_MODULE_PREFIX) || id.starts_with(POLYFILL_PREFIX));
    return Ok(LoadedSource {
      source: arcstr::literal!(EMPTY_MODULE_SOURCE),
      module_type: ModuleType::Empty,
      hint: FormatHint::CommonJs,
    });
  }

  let path = Path::new(id);
  let content = fs.read_to_string(path).map_err(|err| InstallError::io(path, err))?;

  match path.extension().and_then(|ext| ext.to_str()) {
    Some("json") => {
      if let Err(err) = serde_json::from_str::<serde_json::Value>(&content) {
        return Err(InstallError::ParseError { module: stable_id.to_string(), message: err.to_string() });
      }
      Ok(LoadedSource {
        source: concat_string!("module.exports = ", content.trim_end(), ";\n").into(),
        module_type: ModuleType::Json,
        hint: FormatHint::CommonJs,
      })
    }
    Some("mjs") => {
      Ok(LoadedSource { source: content.into(), module_type: ModuleType::Js, hint: FormatHint::Esm })
    }
    Some("cjs") => {
      Ok(LoadedSource { source: content.into(), module_type: ModuleType::Js, hint: FormatHint::CommonJs })
    }
    _ => Ok(LoadedSource { source: content.into(), module_type: ModuleType::Js, hint: FormatHint::Unknown }),
  }
}

#[cfg(test)]
mod tests {
  use webdeps_fs::OsFileSystem;

  use super::*;

  #[test]
  fn wraps_json_documents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(&path, "{ \"a\": 1 }\n").unwrap();

    let loaded = load_source(&OsFileSystem, path.to_str().unwrap(), "data.json").unwrap();
    assert_eq!(loaded.source.as_str(), "module.exports = { \"a\": 1 };\n");
    assert_eq!(loaded.module_type, ModuleType::Json);
    assert_eq!(loaded.hint, FormatHint::CommonJs);

    std::fs::write(&path, "{ a: 1 }").unwrap();
    let err = load_source(&OsFileSystem, path.to_str().unwrap(), "data.json").err().unwrap();
    assert!(matches!(err, InstallError::ParseError { module, .. } if module == "data.json"));
  }

  #[test]
  fn loads_virtual_modules() {
    let runtime = load_source(&OsFileSystem, RUNTIME_MODULE_ID, "webdeps:runtime").unwrap();
    assert!(runtime.source.contains("__commonJS"));
    assert_eq!(runtime.hint, FormatHint::Esm);

    let empty = load_source(&OsFileSystem, "\0empty:fs", "empty:fs").unwrap();
    assert_eq!(empty.module_type, ModuleType::Empty);
    assert_eq!(empty.source.as_str(), EMPTY_MODULE_SOURCE);
  }
}
