//! # Identity Hashing
//!
//! Base-37 rolling hash mapping a short text identifier (a username) to a
//! compact numeric key.
//!
//! The hash is a protocol-level identity: it is stored and exchanged by
//! peers, so the mapping must stay byte-for-byte stable across versions.
//! Letters hash case-insensitively (`"MOD"` and `"mod"` collide on purpose)
//! and only the first twelve characters contribute.

use crate::config::{HASH_RADIX, MAX_HASH_CHARS};

/// Hash a text identifier into its protocol identity key.
///
/// Deterministic, total, and pure: every input maps to exactly one `i64`,
/// and no input fails. The empty string hashes to 0.
///
/// Each of the first twelve characters folds into the accumulator as
/// `h = h * 37 + code(c)`, where letters map to 1..=26 (case-insensitive),
/// digits to 27..=36, and anything else to 0. Trailing base-37 zero digits
/// are then stripped, so `"a"` and `"a "` hash identically.
///
/// Accumulation runs in 128-bit arithmetic; twelve base-37 digits stay well
/// inside `i128`, and the final value always fits `i64`.
///
/// ```rust
/// use packetbuf::identity_hash;
///
/// assert_eq!(identity_hash("a"), 1);
/// assert_eq!(identity_hash("MOD"), identity_hash("mod"));
/// ```
pub fn identity_hash(text: &str) -> i64 {
    let mut h: i128 = 0;

    for c in text.chars().take(MAX_HASH_CHARS) {
        h *= HASH_RADIX;
        match c {
            'A'..='Z' => h += 1 + (c as i128 - 'A' as i128),
            'a'..='z' => h += 1 + (c as i128 - 'a' as i128),
            '0'..='9' => h += 27 + (c as i128 - '0' as i128),
            _ => {}
        }
    }

    while h % HASH_RADIX == 0 && h != 0 {
        h /= HASH_RADIX;
    }

    h as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_hashes_to_zero() {
        assert_eq!(identity_hash(""), 0);
    }

    #[test]
    fn single_letter() {
        assert_eq!(identity_hash("a"), 1);
        assert_eq!(identity_hash("A"), 1);
        assert_eq!(identity_hash("z"), 26);
    }

    #[test]
    fn single_digit() {
        assert_eq!(identity_hash("0"), 27);
        assert_eq!(identity_hash("9"), 36);
    }

    #[test]
    fn hand_computed_word() {
        // m=13, o=15, d=4: ((13 * 37) + 15) * 37 + 4
        assert_eq!(identity_hash("mod"), 18356);
    }

    #[test]
    fn letters_hash_case_insensitively() {
        assert_eq!(identity_hash("MOD"), identity_hash("mod"));
        assert_eq!(identity_hash("Player1"), identity_hash("pLaYeR1"));
    }

    #[test]
    fn truncates_after_twelve_characters() {
        assert_eq!(
            identity_hash("abcdefghijkl"),
            identity_hash("abcdefghijklmnop")
        );
        assert_ne!(
            identity_hash("abcdefghijk"),
            identity_hash("abcdefghijkl")
        );
    }

    #[test]
    fn trailing_non_alphanumerics_strip_away() {
        // A trailing space multiplies by 37 without adding, and the
        // zero-digit strip undoes it.
        assert_eq!(identity_hash("a "), identity_hash("a"));
        assert_eq!(identity_hash("mod__"), identity_hash("mod"));
    }

    #[test]
    fn longest_input_does_not_overflow() {
        // Twelve 'z' characters is close to the largest reachable value.
        let h = identity_hash("zzzzzzzzzzzz");
        assert!(h > 0);
    }
}
