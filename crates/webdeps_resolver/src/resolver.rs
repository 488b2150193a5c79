use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use oxc_resolver::{ResolveError, ResolveOptions, Resolver as OxcResolver};
use sugar_path::SugarPath;

#[derive(Debug)]
pub struct Resolver {
  cwd: PathBuf,
  jail: PathBuf,
  inner: OxcResolver,
}

#[derive(Debug)]
pub struct ResolveReturn {
  pub path: ArcStr,
  /// The package's `browser` field maps the target to `false`; it resolves to an empty module.
  pub ignored: bool,
}

impl Resolver {
  pub fn new(cwd: PathBuf) -> Self {
    let node_modules = cwd.join("node_modules");
    let jail = dunce::canonicalize(&node_modules).unwrap_or(node_modules);

    let options = ResolveOptions {
      // First match wins, in this order.
      extensions: vec![".mjs".to_string(), ".js".to_string(), ".json".to_string()],
      main_fields: vec!["browser".to_string(), "module".to_string(), "main".to_string()],
      condition_names: vec!["import".to_string(), "browser".to_string(), "default".to_string()],
      alias_fields: vec![vec!["browser".to_string()]],
      // An installed package that shares its name with a host built-in always wins.
      builtin_modules: false,
      ..ResolveOptions::default()
    };

    Self { cwd, jail, inner: OxcResolver::new(options) }
  }

  pub fn cwd(&self) -> &Path {
    &self.cwd
  }

  /// The canonical `<cwd>/node_modules` directory every resolved path must live in.
  pub fn jail(&self) -> &Path {
    &self.jail
  }

  pub fn is_inside_jail(&self, path: &Path) -> bool {
    path.starts_with(&self.jail)
  }

  pub fn resolve(
    &self,
    importer: Option<&Path>,
    specifier: &str,
  ) -> Result<ResolveReturn, ResolveError> {
    let dir = importer
      .and_then(Path::parent)
      .filter(|inner| inner.components().next().is_some())
      .unwrap_or(self.cwd.as_path());

    match self.inner.resolve(dir, specifier) {
      Ok(resolution) => {
        Ok(ResolveReturn { path: path_to_arcstr(&resolution.full_path()), ignored: false })
      }
      Err(ResolveError::Ignored(path)) => {
        Ok(ResolveReturn { path: path_to_arcstr(&path), ignored: true })
      }
      Err(err) => Err(err),
    }
  }
}

fn path_to_arcstr(path: &Path) -> ArcStr {
  path.to_slash_lossy().as_ref().into()
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;

  fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
  }

  #[test]
  fn prefers_mjs_and_stays_in_jail() {
    let dir = tempfile::tempdir().unwrap();
    let root = dunce::canonicalize(dir.path()).unwrap();
    write(&root, "node_modules/pkg/package.json", r#"{"name":"pkg","module":"index.mjs"}"#);
    write(&root, "node_modules/pkg/index.mjs", "import './util';");
    write(&root, "node_modules/pkg/util.mjs", "");
    write(&root, "node_modules/pkg/util.js", "");

    let resolver = Resolver::new(root.clone());
    let importer = root.join("node_modules/pkg/index.mjs");
    let resolved = resolver.resolve(Some(&importer), "./util").unwrap();
    assert!(resolved.path.ends_with("node_modules/pkg/util.mjs"));
    assert!(resolver.is_inside_jail(Path::new(resolved.path.as_str())));

    let resolved = resolver.resolve(Some(&importer), "pkg").unwrap();
    assert!(resolved.path.ends_with("node_modules/pkg/index.mjs"));

    assert!(!resolver.is_inside_jail(&root.join("src/main.js")));
  }

  #[test]
  fn reports_missing_modules() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = Resolver::new(dir.path().to_path_buf());
    let err = resolver.resolve(None, "missing-pkg").unwrap_err();
    assert!(matches!(err, ResolveError::NotFound(_)));
  }
}
