use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use webdeps::{
  BuildResult, InstallError, InstallOptions, InstallOutput, Installer, NoopReporter, UnresolvedImportHint,
};

struct Project {
  dir: tempfile::TempDir,
}

impl Project {
  fn new(manifest: &str) -> Self {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("package.json"), manifest).unwrap();
    Self { dir }
  }

  fn root(&self) -> &Path {
    self.dir.path()
  }

  /// Writes `files` (relative to the package directory) into `node_modules/<name>`.
  fn package(&self, name: &str, files: &[(&str, &str)]) -> &Self {
    let package_dir = self.root().join("node_modules").join(name);
    for (path, content) in files {
      let path = package_dir.join(path);
      std::fs::create_dir_all(path.parent().unwrap()).unwrap();
      std::fs::write(path, content).unwrap();
    }
    self
  }

  fn web_modules(&self) -> PathBuf {
    self.root().join("web_modules")
  }

  async fn install(&self, options: InstallOptions) -> BuildResult<InstallOutput> {
    Installer::new(InstallOptions { cwd: Some(self.root().to_path_buf()), ..options })
      .install(&NoopReporter)
      .await
  }

  fn read(&self, path: &str) -> String {
    std::fs::read_to_string(self.web_modules().join(path)).unwrap()
  }

  /// Every emitted file, keyed by its path relative to the output directory.
  fn snapshot(&self) -> BTreeMap<String, String> {
    fn walk(root: &Path, dir: &Path, files: &mut BTreeMap<String, String>) {
      for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
          walk(root, &path, files);
        } else {
          let relative = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
          files.insert(relative, std::fs::read_to_string(&path).unwrap());
        }
      }
    }
    let mut files = BTreeMap::new();
    walk(&self.web_modules(), &self.web_modules(), &mut files);
    files
  }

  fn common_chunks(&self) -> Vec<String> {
    self.snapshot().into_keys().filter(|path| path.starts_with("common/") && path.ends_with(".js")).collect()
  }
}

fn install_error(result: BuildResult<InstallOutput>) -> String {
  let error = result.unwrap_err();
  let install_error = error.find::<InstallError>().unwrap();
  format!("{install_error:?}")
}

#[tokio::test(flavor = "multi_thread")]
async fn installs_every_web_native_package() {
  let project = Project::new(r#"{ "dependencies": { "preact": "^10.0.0", "@scope/icons": "1.0.0" } }"#);
  project
    .package(
      "preact",
      &[
        ("package.json", r#"{ "name": "preact", "module": "dist/preact.mjs", "main": "dist/preact.js" }"#),
        ("dist/preact.mjs", "export function h(type) { return { type }; }\nexport default h;\n"),
      ],
    )
    .package(
      "@scope/icons",
      &[
        ("package.json", r#"{ "module": "index.js" }"#),
        ("index.js", "export const star = \"*\";\n"),
      ],
    );

  let output = project.install(InstallOptions::default()).await.unwrap();
  assert!(output.warnings.is_empty());
  assert_eq!(output.entries.keys().collect::<Vec<_>>(), ["preact", "@scope--icons"]);

  let preact = project.read("preact.js");
  assert!(preact.contains("function h(type)"));
  assert!(preact.contains("export {"));
  assert!(preact.ends_with("//# sourceMappingURL=preact.js.map\n"));
  assert!(project.read("@scope--icons.js").contains("star"));
  assert!(project.web_modules().join("preact.js.map").is_file());

  let import_map: serde_json::Value = serde_json::from_str(&project.read("import-map.json")).unwrap();
  assert_eq!(import_map["imports"]["preact"], "./preact.js");
  assert_eq!(import_map["imports"]["@scope/icons"], "./@scope--icons.js");
  assert!(project.common_chunks().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn whitelisted_package_must_be_web_native() {
  let project = Project::new(
    r#"{ "dependencies": { "preact": "*", "legacy-pkg": "*" }, "webdeps": { "webDependencies": ["preact", "legacy-pkg"] } }"#,
  );
  project
    .package("preact", &[("package.json", r#"{ "module": "index.mjs" }"#), ("index.mjs", "export const h = 1;\n")])
    .package("legacy-pkg", &[("package.json", r#"{ "main": "index.js" }"#), ("index.js", "module.exports = 1;\n")]);

  let error = install_error(project.install(InstallOptions::default()).await);
  assert!(error.contains("NotWebNative"));
  assert!(error.contains("legacy-pkg"));
  assert!(!project.web_modules().exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn inferred_mode_skips_packages_without_module_entry() {
  let project = Project::new(r#"{ "dependencies": { "preact": "*", "legacy-pkg": "*" } }"#);
  project
    .package("preact", &[("package.json", r#"{ "module": "index.mjs" }"#), ("index.mjs", "export const h = 1;\n")])
    .package("legacy-pkg", &[("package.json", r#"{ "main": "index.js" }"#), ("index.js", "module.exports = 1;\n")]);

  let output = project.install(InstallOptions::default()).await.unwrap();
  assert_eq!(output.entries.keys().collect::<Vec<_>>(), ["preact"]);
  let files = project.snapshot();
  assert!(files.contains_key("preact.js"));
  assert!(!files.contains_key("legacy-pkg.js"));
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_dependency_set_is_an_error() {
  let project = Project::new(r#"{ "dependencies": {} }"#);
  let error = install_error(project.install(InstallOptions::default()).await);
  assert_eq!(error, "EmptyDependencySet");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_package_is_an_error() {
  let project = Project::new(r#"{ "webdeps": { "webDependencies": ["preact"] } }"#);
  let error = install_error(project.install(InstallOptions::default()).await);
  assert!(error.contains("PackageNotInstalled"));
}

#[tokio::test(flavor = "multi_thread")]
async fn code_shared_by_two_packages_lands_in_one_common_chunk() {
  let project = Project::new(r#"{ "dependencies": { "a": "*", "b": "*" } }"#);
  project
    .package(
      "a",
      &[
        ("package.json", r#"{ "module": "index.mjs" }"#),
        ("index.mjs", "export function foo() {\n  return \"foo\";\n}\n"),
      ],
    )
    .package(
      "b",
      &[
        ("package.json", r#"{ "module": "index.mjs" }"#),
        ("index.mjs", "import { foo } from \"a\";\nexport const bar = () => foo() + \"bar\";\n"),
      ],
    );

  project.install(InstallOptions::default()).await.unwrap();

  let common_chunks = project.common_chunks();
  assert_eq!(common_chunks.len(), 1);
  let shared = project.read(&common_chunks[0]);
  assert!(shared.contains("function foo()"));

  let a = project.read("a.js");
  let b = project.read("b.js");
  assert!(!a.contains("function foo()"));
  assert!(!b.contains("function foo()"));
  assert!(a.contains("from \"./common/"));
  assert!(b.contains("from \"./common/"));
  assert!(b.contains("bar"));
}

#[tokio::test(flavor = "multi_thread")]
async fn installs_are_idempotent() {
  let project = Project::new(r#"{ "dependencies": { "a": "*", "b": "*" } }"#);
  project
    .package(
      "a",
      &[("package.json", r#"{ "module": "index.mjs" }"#), ("index.mjs", "export const foo = \"foo\";\n")],
    )
    .package(
      "b",
      &[
        ("package.json", r#"{ "module": "index.mjs" }"#),
        ("index.mjs", "import { foo } from \"a\";\nexport const bar = foo + \"bar\";\n"),
      ],
    );

  project.install(InstallOptions::default()).await.unwrap();
  let first = project.snapshot();
  project.install(InstallOptions::default()).await.unwrap();
  assert_eq!(first, project.snapshot());
}

#[tokio::test(flavor = "multi_thread")]
async fn strict_mode_refuses_commonjs() {
  let project = Project::new(r#"{ "dependencies": { "mixed": "*" } }"#);
  project.package(
    "mixed",
    &[
      ("package.json", r#"{ "module": "index.mjs" }"#),
      ("index.mjs", "import value from \"./lib.js\";\nexport default value;\n"),
      ("lib.js", "module.exports = 42;\n"),
    ],
  );

  let result = project.install(InstallOptions { strict: Some(true), ..InstallOptions::default() }).await;
  let error = result.unwrap_err();
  assert!(matches!(
    error.find::<InstallError>(),
    Some(InstallError::UnresolvedImport { hint: Some(UnresolvedImportHint::LegacyFormatDisabled), .. })
  ));
  assert!(!project.web_modules().exists());

  project.install(InstallOptions::default()).await.unwrap();
  assert!(project.read("mixed.js").contains("__commonJS"));
}

#[tokio::test(flavor = "multi_thread")]
async fn builtins_are_polyfilled_on_request() {
  let project = Project::new(r#"{ "dependencies": { "uses-path": "*" } }"#);
  project.package(
    "uses-path",
    &[
      ("package.json", r#"{ "module": "index.mjs" }"#),
      ("index.mjs", "import { join } from \"path\";\nexport const joined = join(\"a\", \"b\");\n"),
    ],
  );

  let output = project.install(InstallOptions::default()).await.unwrap();
  assert_eq!(output.warnings.len(), 1);
  assert!(matches!(
    output.warnings[0].downcast_ref::<InstallError>(),
    Some(InstallError::UnresolvedImport { hint: Some(UnresolvedImportHint::BuiltinsDisabled), .. })
  ));
  assert!(project.read("uses-path.js").contains("from \"path\""));

  let output = project.install(InstallOptions { builtins: Some(true), ..InstallOptions::default() }).await.unwrap();
  assert!(output.warnings.is_empty());
  let code = project.read("uses-path.js");
  assert!(!code.contains("from \"path\""));
  assert!(code.contains("__commonJS"));
}

#[tokio::test(flavor = "multi_thread")]
async fn importing_a_missing_export_is_an_error() {
  let project = Project::new(r#"{ "dependencies": { "a": "*", "b": "*" } }"#);
  project
    .package("a", &[("package.json", r#"{ "module": "index.mjs" }"#), ("index.mjs", "export const foo = 1;\n")])
    .package(
      "b",
      &[
        ("package.json", r#"{ "module": "index.mjs" }"#),
        ("index.mjs", "import { nope } from \"a\";\nexport default nope;\n"),
      ],
    );

  let error = install_error(project.install(InstallOptions::default()).await);
  assert!(error.contains("MissingExport"));
  assert!(error.contains("nope"));
}

#[tokio::test(flavor = "multi_thread")]
async fn dest_and_source_maps_are_configurable() {
  let project = Project::new(r#"{ "dependencies": { "a": "*" }, "webdeps": { "dest": "vendor" } }"#);
  project.package("a", &[("package.json", r#"{ "module": "index.mjs" }"#), ("index.mjs", "export const a = 1;\n")]);

  let output =
    project.install(InstallOptions { source_map: Some(false), ..InstallOptions::default() }).await.unwrap();
  assert_eq!(output.dest, project.root().join("vendor"));
  let code = std::fs::read_to_string(project.root().join("vendor/a.js")).unwrap();
  assert!(!code.contains("sourceMappingURL"));
  assert!(!project.root().join("vendor/a.js.map").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn node_env_is_inlined() {
  let project = Project::new(r#"{ "dependencies": { "a": "*" } }"#);
  project.package(
    "a",
    &[
      ("package.json", r#"{ "module": "index.mjs" }"#),
      ("index.mjs", "export const dev = process.env.NODE_ENV !== \"production\";\n"),
    ],
  );

  project.install(InstallOptions { node_env: Some("development".to_string()), ..InstallOptions::default() }).await.unwrap();
  let code = project.read("a.js");
  assert!(code.contains("\"development\" !== \"production\""));
  assert!(!code.contains("process.env"));
}

#[tokio::test(flavor = "multi_thread")]
async fn dest_never_wipes_the_project() {
  let project = Project::new(r#"{ "dependencies": { "a": "*" }, "webdeps": { "dest": "." } }"#);
  project.package("a", &[("package.json", r#"{ "module": "index.mjs" }"#), ("index.mjs", "export const a = 1;\n")]);
  std::fs::write(project.root().join("precious.txt"), "keep me").unwrap();

  let error = project.install(InstallOptions::default()).await.unwrap_err();
  assert!(matches!(error.find::<InstallError>(), Some(InstallError::InvalidOptions { option: "dest", .. })));

  for dest in ["..", "node_modules", "node_modules/a"] {
    let result = project.install(InstallOptions { dest: Some(dest.into()), ..InstallOptions::default() }).await;
    let error = result.unwrap_err();
    assert!(matches!(error.find::<InstallError>(), Some(InstallError::InvalidOptions { .. })), "{dest}");
  }

  assert_eq!(std::fs::read_to_string(project.root().join("precious.txt")).unwrap(), "keep me");
  assert!(project.root().join("package.json").is_file());
  assert!(project.root().join("node_modules/a/index.mjs").is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn packages_mapping_to_the_same_file_are_rejected() {
  let project = Project::new(r#"{ "dependencies": { "@a-/b": "*", "@a/-b": "*" } }"#);
  project
    .package("@a-/b", &[("package.json", r#"{ "module": "index.mjs" }"#), ("index.mjs", "export const x = 1;\n")])
    .package("@a/-b", &[("package.json", r#"{ "module": "index.mjs" }"#), ("index.mjs", "export const y = 2;\n")]);

  let error = project.install(InstallOptions::default()).await.unwrap_err();
  assert!(matches!(
    error.find::<InstallError>(),
    Some(InstallError::EntryNameCollision { name, .. }) if name == "@a---b"
  ));
  assert!(!project.web_modules().exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn relative_import_cannot_leave_node_modules() {
  let project = Project::new(r#"{ "dependencies": { "escape": "*" } }"#);
  project.package(
    "escape",
    &[
      ("package.json", r#"{ "module": "index.mjs" }"#),
      ("index.mjs", "import secret from \"../../outside.mjs\";\nexport default secret;\n"),
    ],
  );
  std::fs::write(project.root().join("outside.mjs"), "export default \"secret\";\n").unwrap();

  let error = project.install(InstallOptions::default()).await.unwrap_err();
  assert!(matches!(
    error.find::<InstallError>(),
    Some(InstallError::JailViolation { specifier, .. }) if specifier == "../../outside.mjs"
  ));
  assert!(!project.web_modules().exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn module_field_cannot_leave_node_modules() {
  let project = Project::new(r#"{ "dependencies": { "escape": "*" } }"#);
  project.package("escape", &[("package.json", r#"{ "module": "../../outside.mjs" }"#)]);
  std::fs::write(project.root().join("outside.mjs"), "export default \"secret\";\n").unwrap();

  let error = project.install(InstallOptions::default()).await.unwrap_err();
  assert!(matches!(error.find::<InstallError>(), Some(InstallError::JailViolation { .. })));
  assert!(!project.web_modules().exists());
}

/// Names listed by the `export { ... };` statement of a chunk, under their exported spelling.
fn exported_names(code: &str) -> Vec<String> {
  code
    .lines()
    .filter_map(|line| line.strip_prefix("export { ")?.strip_suffix(" };"))
    .flat_map(|list| list.split(", "))
    .map(|item| item.rsplit(" as ").next().unwrap_or(item).to_string())
    .collect()
}

/// Names a chunk imports from `path`, under their exported spelling.
fn imported_names(code: &str, path: &str) -> Vec<String> {
  let suffix = format!(" }} from \"{path}\";");
  code
    .lines()
    .filter_map(|line| line.strip_prefix("import { ")?.strip_suffix(suffix.as_str()))
    .flat_map(|list| list.split(", "))
    .map(|item| item.split(" as ").next().unwrap_or(item).to_string())
    .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn chunks_link_to_each_other() {
  let project = Project::new(r#"{ "dependencies": { "a": "*", "b": "*", "c": "*" } }"#);
  project
    .package(
      "a",
      &[
        ("package.json", r#"{ "module": "index.mjs" }"#),
        ("index.mjs", "export const foo = \"foo\";\nexport default function bar() {\n  return \"bar\";\n}\n"),
      ],
    )
    .package(
      "b",
      &[
        ("package.json", r#"{ "module": "index.mjs" }"#),
        (
          "index.mjs",
          "import bar, { foo } from \"a\";\nexport { default } from \"a\";\nexport const both = foo + bar();\n",
        ),
      ],
    )
    .package(
      "c",
      &[
        ("package.json", r#"{ "module": "index.mjs" }"#),
        ("index.mjs", "import lib, { seven } from \"./lib.js\";\nexport const total = lib.seven + seven;\n"),
        ("lib.js", "module.exports = { seven: 7 };\n"),
      ],
    );

  let output = project.install(InstallOptions::default()).await.unwrap();
  let chunk = |filename: &str| output.chunks.iter().find(|chunk| chunk.filename == filename).unwrap();

  let (a, b, c) = (chunk("a.js"), chunk("b.js"), chunk("c.js"));
  assert!(a.is_entry && b.is_entry && c.is_entry);
  let mut a_exports = a.exports.iter().map(ToString::to_string).collect::<Vec<_>>();
  a_exports.sort();
  assert_eq!(a_exports, ["default", "foo"]);
  let mut b_exports = b.exports.iter().map(ToString::to_string).collect::<Vec<_>>();
  b_exports.sort();
  assert_eq!(b_exports, ["both", "default"]);

  // `a` is shared, so both entries pull its bindings from the same common chunk.
  assert_eq!(a.imports.len(), 1);
  assert_eq!(a.imports, b.imports);
  let common = chunk(&a.imports[0]);
  assert!(!common.is_entry);
  let common_exports = exported_names(&common.code);
  let path = format!("./{}", common.filename);
  for importer in [a, b] {
    let imported = imported_names(&importer.code, &path);
    assert!(!imported.is_empty());
    for name in &imported {
      assert!(
        common_exports.contains(name),
        "{} imports {name}, which {} does not export",
        importer.filename,
        common.filename
      );
    }
    let mut exported = exported_names(&importer.code);
    exported.sort();
    let mut expected = importer.exports.iter().map(ToString::to_string).collect::<Vec<_>>();
    expected.sort();
    assert_eq!(exported, expected);
  }

  // ESM importing CommonJS goes through the interop helpers.
  assert!(!c.imports.contains(&common.filename));
  assert!(c.code.contains("var require_lib = __commonJS(function (exports, module) {\n"));
  assert!(c.code.contains("var import_lib = __toESM(require_lib());\n"));
  assert!(c.code.contains(" = import_lib.default;\n"));
  assert!(c.code.contains("var seven = import_lib.seven;\n"));
  assert_eq!(exported_names(&c.code), ["total"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn destructured_declarations_are_exported() {
  let project = Project::new(r#"{ "dependencies": { "shapes": "*" } }"#);
  project.package(
    "shapes",
    &[
      ("package.json", r#"{ "module": "index.mjs" }"#),
      (
        "index.mjs",
        "const config = { width: 1, sizes: [2, 3], rest: { depth: 4 } };\n\
         export const { width, sizes: [small, large = 5], ...others } = config;\n\
         export function area() {\n  return width * small;\n}\n\
         export class Box {}\n",
      ),
    ],
  );

  let output = project.install(InstallOptions::default()).await.unwrap();
  let shapes = output.chunks.iter().find(|chunk| chunk.filename == "shapes.js").unwrap();
  let mut exports = shapes.exports.iter().map(ToString::to_string).collect::<Vec<_>>();
  exports.sort();
  assert_eq!(exports, ["Box", "area", "large", "others", "small", "width"]);
}
