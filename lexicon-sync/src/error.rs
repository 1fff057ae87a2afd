//! Error types for lexicon-sync.

use std::path::PathBuf;

use thiserror::Error;

use lexicon_core::StoreError;

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the entity store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (document write path, content hashing).
    #[error("document YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on document load — includes file path and line
    /// context from serde_yaml.
    #[error("failed to parse document at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON serialization/deserialization error (audit log).
    #[error("audit log JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is missing its required identity attribute.
    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
