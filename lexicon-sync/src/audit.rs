//! Audit log — durable record of rename actions observed by reconciliation.
//!
//! Renames matter downstream: a consumer that keyed off the old alias needs
//! to know the canonical file moved. [`FileAuditLog`] appends one JSON
//! object per line to an actions file, so concurrent history stays readable
//! with plain tools; [`MemoryAuditLog`] is the in-process recorder used by
//! tests and embedders.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lexicon_core::ItemKey;

use crate::error::{io_err, SyncError};

/// A recorded rename: the item `key` is now known as `new_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameAction {
    /// Node type tag of the renamed item's documents.
    pub kind: String,
    pub key: ItemKey,
    pub new_name: String,
    pub at: DateTime<Utc>,
}

/// Sink for rename actions.
pub trait AuditLog {
    fn record_rename(&mut self, kind: &str, key: ItemKey, new_name: &str)
        -> Result<(), SyncError>;
}

// ---------------------------------------------------------------------------
// FileAuditLog
// ---------------------------------------------------------------------------

/// Append-only JSON-lines audit log at a fixed path.
#[derive(Debug, Clone)]
pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every recorded action back, oldest first.
    pub fn read_back(&self) -> Result<Vec<RenameAction>, SyncError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| io_err(&self.path, e))?;
        let mut actions = Vec::new();
        for line in contents.lines().filter(|l| !l.trim().is_empty()) {
            actions.push(serde_json::from_str(line)?);
        }
        Ok(actions)
    }
}

impl AuditLog for FileAuditLog {
    fn record_rename(
        &mut self,
        kind: &str,
        key: ItemKey,
        new_name: &str,
    ) -> Result<(), SyncError> {
        let action = RenameAction {
            kind: kind.to_string(),
            key,
            new_name: new_name.to_string(),
            at: Utc::now(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| io_err(&self.path, e))?;
        let line = serde_json::to_string(&action)?;
        writeln!(file, "{line}").map_err(|e| io_err(&self.path, e))?;

        tracing::info!("recorded rename: {} -> '{}'", action.key, action.new_name);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryAuditLog
// ---------------------------------------------------------------------------

/// Vec-backed recorder for tests and in-process embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    pub actions: Vec<RenameAction>,
}

impl MemoryAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for MemoryAuditLog {
    fn record_rename(
        &mut self,
        kind: &str,
        key: ItemKey,
        new_name: &str,
    ) -> Result<(), SyncError> {
        self.actions.push(RenameAction {
            kind: kind.to_string(),
            key,
            new_name: new_name.to_string(),
            at: Utc::now(),
        });
        Ok(())
    }
}
