//! Address normalization.
//!
//! Addresses appear in two spellings across the registry documents and the
//! chain API: short hex (`0x1`) and zero-padded hex (`0x000…001`). The
//! canonical form used everywhere in this workspace is the padded one:
//! `0x` followed by exactly 64 lowercase hex digits.

/// Number of hex digits in a canonical address.
pub const ADDRESS_HEX_LEN: usize = 64;

/// Normalize a raw address string into its canonical form.
///
/// The function is total: it never fails. Blank input (empty or whitespace
/// only, or a bare `0x` prefix) normalizes to the empty string so callers can
/// treat it uniformly as "missing". Input longer than 64 hex digits is only
/// lowercased and prefixed; nothing is truncated.
///
/// ```
/// use types::normalize_address;
///
/// let short = normalize_address("0x1");
/// let padded = normalize_address(
///     "0x0000000000000000000000000000000000000000000000000000000000000001",
/// );
/// assert_eq!(short, padded);
/// assert_eq!(normalize_address("   "), "");
/// ```
pub fn normalize_address(raw: &str) -> String {
    let trimmed = raw.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .to_ascii_lowercase();

    if hex.is_empty() {
        return String::new();
    }

    if hex.len() >= ADDRESS_HEX_LEN {
        return format!("0x{}", hex);
    }

    format!("0x{:0>width$}", hex, width = ADDRESS_HEX_LEN)
}

/// Whether a normalized address is the "missing" sentinel.
pub fn is_missing(normalized: &str) -> bool { normalized.is_empty() }

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn short_and_padded_forms_are_equal() {
        assert_eq!(normalize_address("0x1"), ONE);
        assert_eq!(normalize_address(ONE), ONE);
        assert_eq!(normalize_address("0X01"), ONE);
        assert_eq!(normalize_address("1"), ONE);
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["0x1", "0xABC", "abc", ONE, "0x00000a", "  0x2  ", "0x"] {
            let once = normalize_address(raw);
            assert_eq!(normalize_address(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn lowercases_hex_digits() {
        let n = normalize_address(
            "0x000000000000000000000000000000000000000000000000000000000000000A",
        );
        assert!(n.ends_with('a'));
        assert_eq!(n.len(), 2 + ADDRESS_HEX_LEN);
    }

    #[test]
    fn blank_input_is_missing() {
        assert!(is_missing(&normalize_address("")));
        assert!(is_missing(&normalize_address("   \t")));
        assert!(is_missing(&normalize_address("0x")));
    }

    #[test]
    fn overlong_input_is_not_truncated() {
        let raw = format!("0x{}", "f".repeat(70));
        assert_eq!(normalize_address(&raw), raw);
    }
}
