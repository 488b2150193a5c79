use xxhash_rust::xxh3::xxh3_128;

pub fn xxhash_base64_url(input: &[u8]) -> String {
  let hash = xxh3_128(input).to_le_bytes();
  base64_simd::URL_SAFE_NO_PAD.encode_to_string(hash)
}

pub fn base64_url(input: &[u8]) -> String {
  base64_simd::URL_SAFE_NO_PAD.encode_to_string(input)
}

#[test]
fn test_xxhash_base64_url() {
  let hash = xxhash_base64_url(b"hello");
  assert_eq!(hash.len(), 22);
  assert_eq!(hash, xxhash_base64_url(b"hello"));
  assert_ne!(hash, xxhash_base64_url(b"hello!"));
  assert!(hash.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_')));
}
