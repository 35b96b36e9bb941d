//! Small helpers shared by the repositories.

use chrono::{DateTime, Utc};
use rand::Rng;

const ID_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Generate a record id of the form `{prefix}_{epoch_millis}_{random}`.
///
/// Two ids minted in the same millisecond only differ by a 9-character
/// base-36 suffix. Collisions are possible, just very unlikely.
#[must_use]
pub fn generate_id(prefix: &str, now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(ID_SUFFIX_ALPHABET[rng.gen_range(0..ID_SUFFIX_ALPHABET.len())]))
        .collect();
    format!("{prefix}_{}_{suffix}", now.timestamp_millis())
}

/// Count whitespace-separated words.
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Round to one decimal place
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
