use std::borrow::Cow;

use oxc::syntax::{
  identifier::{self, is_identifier_part, is_identifier_start},
  keyword::is_reserved_keyword_or_global_object,
};

use crate::concat_string;

pub fn is_validate_identifier_name(name: &str) -> bool {
  identifier::is_identifier_name(name)
}

/// Turns an arbitrary string into something usable as a binding name.
///
/// `lit-html` becomes `lit_html`, `@scope/pkg` becomes `_scope_pkg` and `1x` becomes `_1x`.
pub fn legitimize_identifier_name(name: &str) -> Cow<str> {
  let mut legitimized = String::new();
  let mut chars_indices = name.char_indices();

  let mut first_invalid_char_index = None;

  if let Some((idx, first_char)) = chars_indices.next() {
    if !is_identifier_start(first_char) {
      first_invalid_char_index = Some(idx);
    }
  }

  if first_invalid_char_index.is_none() {
    first_invalid_char_index =
      chars_indices.find(|(_idx, char)| !is_identifier_part(*char)).map(|(idx, _)| idx);
  }

  let Some(first_invalid_char_index) = first_invalid_char_index else {
    if name.is_empty() || is_reserved_keyword_or_global_object(name) {
      return Cow::Owned(concat_string!("_", name));
    }
    return Cow::Borrowed(name);
  };

  let (first_valid_part, rest_part) = name.split_at(first_invalid_char_index);
  legitimized.push_str(first_valid_part);
  for char in rest_part.chars() {
    if is_identifier_part(char) {
      legitimized.push(char);
    } else {
      legitimized.push('_');
    }
  }

  if legitimized.starts_with(|c: char| c.is_ascii_digit()) {
    legitimized.insert(0, '_');
  }

  Cow::Owned(legitimized)
}

pub fn property_access_str(obj: &str, prop: &str) -> String {
  if is_validate_identifier_name(prop) {
    concat_string!(obj, ".", prop)
  } else {
    concat_string!(obj, "[", to_string_literal(prop), "]")
  }
}

pub fn to_module_import_export_name(name: &str) -> String {
  if is_validate_identifier_name(name) { name.into() } else { to_string_literal(name) }
}

/// Property key position inside an object literal.
pub fn to_property_key(name: &str) -> String {
  to_module_import_export_name(name)
}

/// Renders `value` as a double-quoted JavaScript string literal.
pub fn to_string_literal(value: &str) -> String {
  // Serializing a `&str` is infallible.
  serde_json::to_string(value).unwrap_or_else(|_| concat_string!("\"", value, "\""))
}

#[test]
fn test_is_validate_identifier_name() {
  assert!(is_validate_identifier_name("foo"));
  assert!(!is_validate_identifier_name("1aaaa"));
  assert!(!is_validate_identifier_name("😈"));
}

#[test]
fn test_legitimize_identifier_name() {
  assert_eq!(legitimize_identifier_name("foo"), "foo");
  assert_eq!(legitimize_identifier_name("lit-html"), "lit_html");
  assert_eq!(legitimize_identifier_name("@scope--pkg"), "_scope__pkg");
  assert_eq!(legitimize_identifier_name("1x"), "_1x");
  assert_eq!(legitimize_identifier_name("default"), "_default");
  assert_eq!(legitimize_identifier_name(""), "_");
}

#[test]
fn test_property_access_str() {
  assert_eq!(property_access_str("ns", "foo"), "ns.foo");
  assert_eq!(property_access_str("ns", "foo-bar"), "ns[\"foo-bar\"]");
}
