pub fn sanitize_file_name(str: &str) -> String {
  let mut sanitized = String::with_capacity(str.len());
  for char in str.chars() {
    if char.is_ascii_alphanumeric() || matches!(char, '-' | '_' | '.' | '@') {
      sanitized.push(char);
    } else {
      sanitized.push('_');
    }
  }
  sanitized
}

/// Turns a package name into a flat, filesystem-safe module identifier.
///
/// Separators become `--`. The mapping is not injective (`@a-/b` and `@a/-b` both give `@a---b`), so callers
/// that key output files by it must check for collisions.
pub fn sanitize_package_name(name: &str) -> String {
  let mut sanitized = String::with_capacity(name.len() + 2);
  for char in name.chars() {
    if matches!(char, '/' | '\\') {
      sanitized.push_str("--");
    } else {
      sanitized.push(char);
    }
  }
  sanitized
}

#[test]
fn test_sanitize_file_name() {
  assert_eq!(sanitize_file_name("\0+a=Z_0-"), "__a_Z_0-");
  assert_eq!(sanitize_file_name("lit-html.min"), "lit-html.min");
}

#[test]
fn test_sanitize_package_name() {
  assert_eq!(sanitize_package_name("preact"), "preact");
  assert_eq!(sanitize_package_name("@scope/pkg"), "@scope--pkg");
  assert_eq!(sanitize_package_name("@scope/pkg/sub"), "@scope--pkg--sub");
  assert_ne!(sanitize_package_name("@a/b-c"), sanitize_package_name("@a-b/c"));
  assert_eq!(sanitize_package_name("@a-/b"), sanitize_package_name("@a/-b"));
}
