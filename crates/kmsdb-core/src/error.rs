use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds surfaced by the engine. Per-file `Extraction` errors are
/// absorbed by the directory loader; every other kind propagates to the
/// caller as-is so the surrounding application can tell "ingest first"
/// apart from "query failed".
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid chunking parameters: size={size} overlap={overlap} (need size > 0 and overlap < size)")]
    InvalidChunking { size: usize, overlap: usize },

    #[error("failed to extract text from {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    #[error("index is not ready; ingest documents first")]
    IndexNotReady,

    #[error("index consistency violation: {0}")]
    Consistency(String),

    #[error("persistence failure: {0}")]
    Persistence(String),

    #[error("embedding failure: {0}")]
    Embedding(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn extraction(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Error::Extraction { path: path.into(), reason: reason.to_string() }
    }

    pub fn consistency(msg: impl std::fmt::Display) -> Self {
        Error::Consistency(msg.to_string())
    }

    pub fn persistence(err: impl std::fmt::Display) -> Self {
        Error::Persistence(err.to_string())
    }

    pub fn embedding(err: impl std::fmt::Display) -> Self {
        Error::Embedding(err.to_string())
    }

    pub fn invalid_config(msg: impl std::fmt::Display) -> Self {
        Error::InvalidConfig(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
