//! Identifier generation for stored entities.

use chrono::{DateTime, Utc};
use rand::Rng;

const SUFFIX_LEN: usize = 9;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `<PREFIX>-<epoch ms>`
pub fn timestamp_id(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, now.timestamp_millis())
}

/// `<PREFIX>-<epoch ms>-<9 random base36 chars>`
pub fn unique_id(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}", timestamp_id(prefix, now), random_suffix(&mut rand::rng()))
}

pub fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| char::from(BASE36_DIGITS[rng.random_range(0..BASE36_DIGITS.len())]))
        .collect()
}

/// Spreadsheet-style suffix: 0 -> A, 25 -> Z, 26 -> AA.
pub fn letter_suffix(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().map(|&b| char::from(b)).collect()
}
