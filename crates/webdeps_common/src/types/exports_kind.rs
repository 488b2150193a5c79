#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportsKind {
  Esm,
  CommonJs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleType {
  Js,
  Json,
  /// A file the `browser` field maps to `false`, or a built-in without a polyfill.
  Empty,
  /// The helper module and the built-in polyfills shipped with the installer.
  Virtual,
}
