// Declared digest comparison

/// Normalize a declared hex digest for comparison and display
pub fn normalize_digest(digest: &str) -> String {
    digest.trim().to_ascii_lowercase()
}

/// Compare a declared digest with a computed one, ignoring case
pub fn digests_match(expected: &str, actual: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(actual.trim())
}

/// Check that a declared digest looks like hex of the given byte length
pub fn is_hex_digest(digest: &str, byte_len: usize) -> bool {
    let digest = digest.trim();
    digest.len() == byte_len * 2 && hex::decode(digest).is_ok()
}
