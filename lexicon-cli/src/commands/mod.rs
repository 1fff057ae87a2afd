//! CLI subcommands.

pub mod export;
pub mod import;
pub mod report;

use std::path::{Path, PathBuf};

use lexicon_sync::{audit::FileAuditLog, FolderLayout};

/// Snapshot path: explicit `--store` or `<root>/store.yaml`.
pub(crate) fn store_path(root: &Path, store: Option<PathBuf>) -> PathBuf {
    store.unwrap_or_else(|| root.join("store.yaml"))
}

pub(crate) fn layout(root: &Path) -> FolderLayout {
    FolderLayout::at(root)
}

pub(crate) fn audit_log(root: &Path) -> FileAuditLog {
    FileAuditLog::new(root.join("actions.jsonl"))
}
