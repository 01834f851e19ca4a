//! Error types for loading and configuring a dictionary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures that abort a load or construction.
#[derive(Debug, Error)]
pub enum Error {
    #[error("word list {path:?} is unavailable")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to allocate {what} ({requested} entries)")]
    AllocationFailure {
        what: &'static str,
        requested: usize,
    },

    #[error("invalid config {name}: {message}")]
    InvalidConfig { name: &'static str, message: String },
}

impl Error {
    pub fn source_unavailable(path: impl Into<PathBuf>, source: io::Error) -> Error {
        Error::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_config(name: &'static str, message: impl Into<String>) -> Error {
        Error::InvalidConfig {
            name,
            message: message.into(),
        }
    }
}

/// Why a single word record was skipped during a load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("empty record")]
    Empty,

    #[error("record of {len} bytes exceeds the {max} byte limit")]
    TooLong { len: usize, max: usize },

    #[error("record is not valid UTF-8")]
    NotUtf8,
}
