//! # rbdict
//!
//! A case-insensitive word membership index.
//!
//! Words are hashed into a fixed, prime number of buckets; each bucket
//! resolves collisions with a red-black tree ordered without regard to
//! ASCII case. The index is built once from a word list and then queried.
//!
//! ## Architecture
//!
//! 1. **[`RbTree`]**: the per-bucket collision store. Insertion and lookup
//!    are O(log n); nodes carry parent back-references for rebalancing.
//!
//! 2. **[`StrMap`]**: the bucket array. Routes a word with a case-insensitive
//!    djb2 hash and delegates to that bucket's tree.
//!
//! 3. **[`Dictionary`]**: the `load` / `check` / `size` / `unload` surface
//!    over a [`WordSource`].
//!
//! ## Example
//!
//! ```rust
//! use rbdict::{Dictionary, TextSource};
//!
//! let mut dict = Dictionary::new();
//! let report = dict.load(&TextSource::new("apple\r\nBanana\r\ncherry\r\n")).unwrap();
//! assert_eq!(report.inserted, 3);
//!
//! assert!(dict.check("BANANA"));
//! assert!(!dict.check("grape"));
//! assert_eq!(dict.size(), 3);
//!
//! dict.unload();
//! assert_eq!(dict.size(), 0);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

pub mod dictionary;
pub mod error;
pub mod hash;
pub mod rbtree;
pub mod source;
pub mod strmap;

pub use dictionary::{Dictionary, LoadReport, SharedDictionary};
pub use error::{Error, RecordError, Result};
pub use rbtree::{Color, NodeId, RbTree};
pub use source::{FileSource, TextSource, WordSource};
pub use strmap::{Bucket, BucketStats, StrMap};

/// Longest accepted word, in bytes
/// (pneumonoultramicroscopicsilicovolcanoconiosis).
pub const MAX_WORD_LEN: usize = 45;

/// Default bucket count. Prime, and comfortably above the size of a typical
/// English word list divided by a small tree depth.
pub const DEFAULT_CAPACITY: usize = 52_937;

/// Configuration for a [`Dictionary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of hash buckets; a prime spreads djb2 hashes best
    pub capacity: usize,
    /// Records longer than this many bytes are skipped
    pub max_word_len: usize,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::invalid_config("capacity", "must be non-zero"));
        }
        if self.max_word_len == 0 {
            return Err(Error::invalid_config("max_word_len", "must be non-zero"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_word_len: MAX_WORD_LEN,
        }
    }
}


#[cfg(test)]
mod proptests;
