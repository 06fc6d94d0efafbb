//! Session-scoped identifiers
//!
//! IDs combine the current time with random characters. There is no global
//! counter and no uniqueness check; collisions are improbable within a session.

use rand::Rng;

use super::time::Timestamp;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Number of random characters appended to each ID
const ENTROPY_LEN: usize = 8;

/// Encode a number in lowercase base 36
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Generate an ID of the form `{time in base36}-{8 random base36 chars}`
pub fn generate_id(now: Timestamp, rng: &mut impl Rng) -> String {
    let entropy: String = (0..ENTROPY_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", to_base36(now), entropy)
}
