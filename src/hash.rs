//! Case-insensitive string hashing.
//!
//! Words are routed to buckets with a djb2 rolling hash (`h = h * 33 + c`,
//! seeded with 5381) over their ASCII-lowercased bytes. The caller's string
//! is never modified.

const SEED: u64 = 5381;

/// Hashes `word` ignoring ASCII case.
#[inline]
pub fn hash_ci(word: &str) -> u64 {
    word.bytes().fold(SEED, |h, b| {
        // (h << 5) + h
        h.wrapping_mul(33)
            .wrapping_add(u64::from(b.to_ascii_lowercase()))
    })
}

/// Maps `word` onto one of `capacity` buckets.
#[inline]
pub fn bucket_of(word: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (hash_ci(word) % capacity as u64) as usize
}
