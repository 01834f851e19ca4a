//! Hashed bucket index over red-black collision trees.

use crate::error::{Error, Result};
use crate::hash::bucket_of;
use crate::rbtree::RbTree;

/// One slot of a [`StrMap`].
#[derive(Debug, Default)]
pub struct Bucket {
    count: usize,
    tree: Option<RbTree>,
}

impl Bucket {
    /// Number of distinct words stored in this bucket.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The collision tree, if any word hashed here.
    pub fn tree(&self) -> Option<&RbTree> {
        self.tree.as_ref()
    }

    fn insert(&mut self, word: &str) -> bool {
        let inserted = match &mut self.tree {
            None => {
                self.tree = Some(RbTree::with_value(word));
                true
            }
            Some(tree) => tree.insert(word).1,
        };
        if inserted {
            self.count += 1;
        }
        inserted
    }

    fn contains(&self, word: &str) -> bool {
        self.tree.as_ref().is_some_and(|t| t.contains(word))
    }
}

/// Bucket occupancy statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketStats {
    /// Number of buckets
    pub capacity: usize,
    /// Buckets holding at least one word
    pub occupied: usize,
    /// Words stored
    pub entries: usize,
    /// Largest bucket
    pub max_bucket_len: usize,
    /// Tallest collision tree, in nodes
    pub max_tree_height: usize,
    /// `entries / capacity`
    pub load_factor: f64,
}

/// A fixed-capacity hash table of case-insensitive strings.
///
/// Words are routed by [`hash_ci`](crate::hash::hash_ci) modulo the
/// capacity; each bucket keeps its collisions in an [`RbTree`].
#[derive(Debug)]
pub struct StrMap {
    buckets: Box<[Bucket]>,
}

impl StrMap {
    /// Allocates `capacity` empty buckets.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_config("capacity", "must be non-zero"));
        }
        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailure {
                what: "bucket array",
                requested: capacity,
            })?;
        buckets.resize_with(capacity, Bucket::default);
        Ok(Self {
            buckets: buckets.into_boxed_slice(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Inserts `word`, ignoring a trailing line terminator.
    ///
    /// Returns `false` if a case-insensitively equal word is already
    /// present or nothing is left after trimming; the count is only
    /// incremented for new words.
    pub fn insert(&mut self, word: &str) -> bool {
        let word = trim_terminator(word);
        if word.is_empty() {
            return false;
        }
        let idx = bucket_of(word, self.buckets.len());
        self.buckets[idx].insert(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        let word = trim_terminator(word);
        self.buckets[bucket_of(word, self.buckets.len())].contains(word)
    }

    /// Total number of distinct words, summed over all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Bucket::count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.tree.is_none())
    }

    /// The bucket `word` routes to.
    pub fn bucket_for(&self, word: &str) -> &Bucket {
        &self.buckets[bucket_of(trim_terminator(word), self.buckets.len())]
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn stats(&self) -> BucketStats {
        let mut stats = BucketStats {
            capacity: self.buckets.len(),
            ..BucketStats::default()
        };
        for bucket in self.buckets.iter() {
            if let Some(tree) = &bucket.tree {
                stats.occupied += 1;
                stats.entries += bucket.count;
                stats.max_bucket_len = stats.max_bucket_len.max(bucket.count);
                stats.max_tree_height = stats.max_tree_height.max(tree.height());
            }
        }
        stats.load_factor = stats.entries as f64 / stats.capacity as f64;
        stats
    }

    /// Drops every collision tree, keeping the bucket array.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            *bucket = Bucket::default();
        }
    }
}

/// Strips a trailing `\n` and then a trailing `\r`.
fn trim_terminator(word: &str) -> &str {
    let word = word.strip_suffix('\n').unwrap_or(word);
    word.strip_suffix('\r').unwrap_or(word)
}
