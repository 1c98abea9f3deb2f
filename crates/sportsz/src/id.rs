//! Short record identifiers.
//!
//! Ids are a prefix plus seven random base-36 characters. Collisions are only
//! as unlikely as the birthday bound makes them, which is plenty for a
//! single-user local store. Not suitable for anything security related.

use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix.
pub const SUFFIX_LEN: usize = 7;

/// Generate a new id with the given prefix using the thread RNG.
#[must_use]
pub fn new_id(prefix: &str) -> String {
    new_id_with(&mut rand::thread_rng(), prefix)
}

/// Generate a new id with the given prefix from a caller-supplied RNG.
#[must_use]
pub fn new_id_with<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> String {
    let mut id = String::with_capacity(prefix.len() + SUFFIX_LEN);
    id.push_str(prefix);
    for _ in 0..SUFFIX_LEN {
        let idx = rng.gen_range(0..ALPHABET.len());
        id.push(char::from(ALPHABET[idx]));
    }
    id
}
