//! Short, URL-safe identifiers for stored files.

use rand::Rng;

/// Characters allowed in a file id.
pub const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of a generated file id.
pub const ID_LENGTH: usize = 7;

/// Generate a new random file id.
///
/// 62^7 (about 3.5 * 10^12) possible values. Uniqueness against existing
/// records is checked by the caller.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..ID_ALPHABET.len());
            ID_ALPHABET[idx] as char
        })
        .collect()
}

/// Check whether a string has the shape of a generated id.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LENGTH && id.bytes().all(|b| ID_ALPHABET.contains(&b))
}
