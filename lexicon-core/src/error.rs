//! Error types for lexicon-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ItemKey;

/// All errors that can arise from store operations and snapshot persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse store snapshot at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An operation referenced an item key the store does not hold.
    #[error("no dictionary item with key {key}")]
    ItemNotFound { key: ItemKey },
}
