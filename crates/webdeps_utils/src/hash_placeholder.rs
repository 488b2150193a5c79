use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

const HASH_PLACEHOLDER_LEFT: &str = "!~{";
const HASH_PLACEHOLDER_RIGHT: &str = "}~";
const HASH_PLACEHOLDER_OVERHEAD: usize = HASH_PLACEHOLDER_LEFT.len() + HASH_PLACEHOLDER_RIGHT.len();

const CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$";

static REPLACER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"!~\{[0-9a-zA-Z_$]{1,17}\}~").expect("hash placeholder regex is valid")
});

fn to_base64(mut value: usize) -> String {
  let mut buf = Vec::new();
  loop {
    buf.push(CHARS[value % 64]);
    value /= 64;
    if value == 0 {
      break;
    }
  }
  buf.reverse();
  String::from_utf8(buf).unwrap_or_default()
}

/// Hands out unique placeholders that stand in for content hashes until every chunk is rendered.
#[derive(Debug, Default)]
pub struct HashPlaceholderGenerator {
  next_index: usize,
}

impl HashPlaceholderGenerator {
  /// `len` is the length of the hash the placeholder is going to be replaced with.
  pub fn generate(&mut self, len: usize) -> String {
    let index = to_base64(self.next_index);
    self.next_index += 1;
    let pad = len.saturating_sub(HASH_PLACEHOLDER_OVERHEAD + index.len());
    let mut placeholder = String::with_capacity(len);
    placeholder.push_str(HASH_PLACEHOLDER_LEFT);
    placeholder.extend(std::iter::repeat('0').take(pad));
    placeholder.push_str(&index);
    placeholder.push_str(HASH_PLACEHOLDER_RIGHT);
    placeholder
  }
}

pub fn extract_hash_placeholders(source: &str) -> Vec<&str> {
  REPLACER_REGEX.find_iter(source).map(|m| m.as_str()).collect()
}

pub fn replace_placeholder_with_hash<'a>(
  source: &'a str,
  final_hashes_by_placeholder: &FxHashMap<String, &str>,
) -> Cow<'a, str> {
  REPLACER_REGEX.replace_all(source, |captures: &Captures<'_>| -> String {
    let placeholder = &captures[0];
    final_hashes_by_placeholder
      .get(placeholder)
      .map_or_else(|| placeholder.to_string(), |hash| (*hash).to_string())
  })
}

#[test]
fn placeholders_keep_the_requested_length() {
  let mut generator = HashPlaceholderGenerator::default();
  let first = generator.generate(8);
  let second = generator.generate(8);
  assert_eq!(first, "!~{000}~");
  assert_eq!(second, "!~{001}~");
  assert_eq!(first.len(), 8);

  let source = format!("import './common/shared-{first}.js';\nimport './{second}.js';");
  assert_eq!(extract_hash_placeholders(&source), vec![first.as_str(), second.as_str()]);

  let mut hashes = FxHashMap::default();
  hashes.insert(first.clone(), "abcdefgh");
  let replaced = replace_placeholder_with_hash(&source, &hashes);
  assert_eq!(replaced, format!("import './common/shared-abcdefgh.js';\nimport './{second}.js';"));
}
