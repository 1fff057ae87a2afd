//! Store snapshot persistence.
//!
//! Persists a [`MemoryStore`] as a single YAML document. Loads return an
//! empty store when the file does not exist yet (first run is not an
//! error); saves use the `.tmp` sibling + rename pattern so a crashed
//! writer never leaves a half-written snapshot behind.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::MemoryStore;

/// On-disk snapshot payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    saved_at: DateTime<Utc>,
    #[serde(flatten)]
    store: MemoryStore,
}

const SNAPSHOT_VERSION: u32 = 1;

/// Load a store snapshot from `path`.
///
/// A missing file yields an empty store; malformed YAML is
/// `StoreError::Parse` with path and line context.
pub fn load(path: &Path) -> Result<MemoryStore, StoreError> {
    if !path.exists() {
        return Ok(MemoryStore::new());
    }
    let contents = std::fs::read_to_string(path)?;
    let snapshot: SnapshotFile =
        serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(snapshot.store)
}

/// Atomically save a store snapshot to `path`.
///
/// Write flow: serialize → `.tmp` sibling → `rename`. The `.tmp` lives in
/// the same directory as the target (same filesystem — no EXDEV).
pub fn save(path: &Path, store: &MemoryStore) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let snapshot = SnapshotFile {
        version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        store: store.clone(),
    };
    let yaml = serde_yaml::to_string(&snapshot)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot".to_string());
    let tmp = path.with_file_name(format!("{file_name}.tmp"));
    std::fs::write(&tmp, yaml)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
