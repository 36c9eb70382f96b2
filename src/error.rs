//! Error types for catalog generation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, writing or loading a catalog.
///
/// A dataset combination that is missing from the tables is not an error;
/// builders return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot compute a bounding extent from an empty list of boxes")]
    EmptyExtent,

    #[error("invalid year or year range: {0:?}")]
    InvalidYear(String),

    #[error("invalid dataset key: {0:?}")]
    InvalidKey(String),

    #[error("invalid tables at {path:?}: {reason}")]
    InvalidTables { path: PathBuf, reason: String },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error at {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Json {
            path: path.into(),
            source,
        }
    }
}
