//! 32-byte hex identifier validation.
//!
//! Entity identifiers travel as `0x` + 64 hex characters (66 total).

/// Check that `value` is a `0x`-prefixed 64-character hex string.
#[must_use]
pub fn is_bytes32_hex(value: &str) -> bool {
    let Some(digits) = value.strip_prefix("0x") else {
        return false;
    };
    digits.len() == 64 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_bytes32() {
        assert!(is_bytes32_hex(&format!("0x{}", "ab".repeat(32))));
        assert!(is_bytes32_hex(&format!("0x{}", "AB".repeat(32))));
    }

    #[test]
    fn test_rejects_missing_prefix() {
        assert!(!is_bytes32_hex(&"ab".repeat(33)));
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(!is_bytes32_hex(&format!("0x{}", "ab".repeat(31))));
        assert!(!is_bytes32_hex(&format!("0x{}", "ab".repeat(33))));
        assert!(!is_bytes32_hex("0x"));
    }

    #[test]
    fn test_rejects_non_hex_digits() {
        assert!(!is_bytes32_hex(&format!("0x{}zz", "ab".repeat(31))));
    }
}
