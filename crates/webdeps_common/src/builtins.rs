use phf::phf_set;

/// Modules provided by Node.js itself.
pub static NODE_BUILTIN_MODULES: phf::Set<&'static str> = phf_set! {
  "assert", "assert/strict", "async_hooks", "buffer", "child_process", "cluster", "console",
  "constants", "crypto", "dgram", "diagnostics_channel", "dns", "dns/promises", "domain", "events",
  "fs", "fs/promises", "http", "http2", "https", "inspector", "module", "net", "os", "path",
  "path/posix", "path/win32", "perf_hooks", "process", "punycode", "querystring", "readline",
  "repl", "stream", "stream/promises", "stream/web", "string_decoder", "sys", "timers",
  "timers/promises", "tls", "trace_events", "tty", "url", "util", "util/types", "v8", "vm", "wasi",
  "worker_threads", "zlib",
};

/// Returns the built-in's canonical name when `specifier` names one, with or without the `node:` scheme.
pub fn is_builtin_module(specifier: &str) -> Option<&str> {
  let name = specifier.strip_prefix("node:").unwrap_or(specifier);
  NODE_BUILTIN_MODULES.contains(name).then_some(name)
}

#[test]
fn test_is_builtin_module() {
  assert_eq!(is_builtin_module("fs"), Some("fs"));
  assert_eq!(is_builtin_module("node:path"), Some("path"));
  assert_eq!(is_builtin_module("fs/promises"), Some("fs/promises"));
  assert_eq!(is_builtin_module("preact"), None);
  assert_eq!(is_builtin_module("./fs"), None);
}
