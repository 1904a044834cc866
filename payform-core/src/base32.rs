//! Character-set check for StrKey base32 payloads.

/// RFC4648 base32 alphabet as used by Stellar StrKeys (no padding symbol).
pub const BASE32_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

fn is_base32_char(c: char) -> bool {
    BASE32_ALPHABET.contains(c)
}

/// True when every character of `s` belongs to [`BASE32_ALPHABET`].
///
/// Uppercase only. An empty string is vacuously valid.
pub fn is_valid_base32(s: &str) -> bool {
    s.chars().all(is_base32_char)
}
