use phf::phf_map;
use webdeps_utils::concat_string;

pub const POLYFILL_PREFIX: &str = "\0polyfill:";
pub const PROCESS_POLYFILL_ID: &str = "\0polyfill:process";
/// Built-ins without a polyfill and files a `browser` field maps to `false`.
pub const EMPTY_MODULE_PREFIX: &str = "\0empty:";

/// CommonJS sources that stand in for Node.js built-ins when built-in shimming is on.
static POLYFILLS: phf::Map<&'static str, &'static str> = phf_map! {
  "assert" => include_str!("assert.js"),
  "assert/strict" => include_str!("assert.js"),
  "events" => include_str!("events.js"),
  "os" => include_str!("os.js"),
  "path" => include_str!("path.js"),
  "path/posix" => include_str!("path.js"),
  "process" => include_str!("process.js"),
  "punycode" => include_str!("punycode.js"),
  "querystring" => include_str!("querystring.js"),
  "string_decoder" => include_str!("string_decoder.js"),
  "url" => include_str!("url.js"),
  "util" => include_str!("util.js"),
};

pub fn polyfill_source(name: &str) -> Option<&'static str> {
  POLYFILLS.get(name).copied()
}

/// The virtual module id a built-in specifier is redirected to.
pub fn builtin_virtual_id(specifier: &str) -> String {
  let name = specifier.strip_prefix("node:").unwrap_or(specifier);
  if POLYFILLS.contains_key(name) {
    concat_string!(POLYFILL_PREFIX, name)
  } else {
    concat_string!(EMPTY_MODULE_PREFIX, name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn redirects_builtins() {
    assert_eq!(builtin_virtual_id("path"), "\0polyfill:path");
    assert_eq!(builtin_virtual_id("node:events"), "\0polyfill:events");
    assert_eq!(builtin_virtual_id("fs"), "\0empty:fs");
    assert!(polyfill_source("process").is_some_and(|source| source.contains("module.exports")));
  }
}
