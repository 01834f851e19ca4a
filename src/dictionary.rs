//! The load/check/size/unload surface used by a spell checker.

use std::path::Path;

use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::error::{RecordError, Result};
use crate::source::{parse_record, FileSource, WordSource};
use crate::strmap::{BucketStats, StrMap};
use crate::Config;

/// Outcome of a successful [`Dictionary::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Distinct words added to the index
    pub inserted: usize,
    /// Records equal, ignoring case, to an earlier record
    pub duplicates: usize,
    /// Blank lines
    pub skipped_empty: usize,
    /// Records longer than the configured maximum
    pub skipped_too_long: usize,
    /// Records that are not UTF-8
    pub skipped_invalid: usize,
}

impl LoadReport {
    /// Every record seen, kept or not.
    pub fn records(&self) -> usize {
        self.inserted
            + self.duplicates
            + self.skipped_empty
            + self.skipped_too_long
            + self.skipped_invalid
    }

    fn skip(&mut self, record: usize, err: &RecordError) {
        match err {
            RecordError::Empty => {
                debug!("record {record}: {err}, skipping");
                self.skipped_empty += 1;
            }
            RecordError::TooLong { .. } => {
                warn!("record {record}: {err}, skipping");
                self.skipped_too_long += 1;
            }
            RecordError::NotUtf8 => {
                warn!("record {record}: {err}, skipping");
                self.skipped_invalid += 1;
            }
        }
    }
}

/// A case-insensitive word dictionary.
///
/// Starts unloaded. [`Dictionary::load`] builds the index with exclusive
/// access; afterwards `&Dictionary` may be shared across threads for
/// concurrent [`Dictionary::check`] calls.
///
/// ```rust
/// use rbdict::Dictionary;
///
/// let mut dict = Dictionary::new();
/// dict.load(&["apple", "Banana", "cherry"]).unwrap();
///
/// assert_eq!(dict.size(), 3);
/// assert!(dict.check("APPLE"));
/// assert!(!dict.check("grape"));
/// ```
#[derive(Debug, Default)]
pub struct Dictionary {
    config: Config,
    map: Option<StrMap>,
}

impl Dictionary {
    /// Create an unloaded dictionary with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an unloaded dictionary with the given configuration.
    ///
    /// The configuration is validated on [`Dictionary::load`].
    pub fn with_config(config: Config) -> Self {
        Self { config, map: None }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loads every valid record of `source`, replacing any previous
    /// contents.
    ///
    /// On error the dictionary is left unloaded. Malformed records are
    /// skipped and tallied in the returned report.
    pub fn load<S: WordSource + ?Sized>(&mut self, source: &S) -> Result<LoadReport> {
        self.unload();
        self.config.validate()?;

        let mut map = StrMap::new(self.config.capacity)?;
        let mut report = LoadReport::default();
        let max_len = self.config.max_word_len;
        let mut record = 0usize;

        let visited = source.visit(&mut |raw| {
            record += 1;
            match parse_record(raw, max_len) {
                Ok(word) => {
                    if map.insert(word) {
                        report.inserted += 1;
                    } else {
                        report.duplicates += 1;
                    }
                }
                Err(err) => report.skip(record, &err),
            }
        });
        if let Err(err) = visited {
            warn!("load failed: {err}");
            return Err(err);
        }

        debug_assert_eq!(map.len(), report.inserted);
        info!(
            "loaded {} words from {} records ({} duplicates, {} skipped)",
            report.inserted,
            report.records(),
            report.duplicates,
            report.skipped_empty + report.skipped_too_long + report.skipped_invalid,
        );
        self.map = Some(map);
        Ok(report)
    }

    /// Loads a newline-separated word list from `path`.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        self.load(&FileSource::new(path.as_ref()))
    }

    /// Returns whether `word` is in the dictionary, ignoring ASCII case.
    ///
    /// Always `false` while unloaded.
    pub fn check(&self, word: &str) -> bool {
        self.map.as_ref().is_some_and(|m| m.contains(word))
    }

    /// Number of distinct words loaded, or 0 while unloaded.
    pub fn size(&self) -> usize {
        self.map.as_ref().map_or(0, StrMap::len)
    }

    pub fn is_loaded(&self) -> bool {
        self.map.is_some()
    }

    pub fn stats(&self) -> Option<BucketStats> {
        self.map.as_ref().map(StrMap::stats)
    }

    /// Releases the index. Safe to call repeatedly or before any load.
    pub fn unload(&mut self) {
        if let Some(map) = self.map.take() {
            debug!("unloading {} words", map.len());
        }
    }
}

/// A [`Dictionary`] that can be reloaded while other threads query it.
///
/// Loads take the write lock, so they never overlap with a check.
#[derive(Debug, Default)]
pub struct SharedDictionary {
    inner: RwLock<Dictionary>,
}

impl SharedDictionary {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            inner: RwLock::new(Dictionary::with_config(config)),
        }
    }

    pub fn load<S: WordSource + ?Sized>(&self, source: &S) -> Result<LoadReport> {
        self.inner.write().load(source)
    }

    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<LoadReport> {
        self.inner.write().load_path(path)
    }

    pub fn check(&self, word: &str) -> bool {
        self.inner.read().check(word)
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    pub fn unload(&self) {
        self.inner.write().unload()
    }

    pub fn into_inner(self) -> Dictionary {
        self.inner.into_inner()
    }
}

impl From<Dictionary> for SharedDictionary {
    fn from(dict: Dictionary) -> Self {
        Self {
            inner: RwLock::new(dict),
        }
    }
}
