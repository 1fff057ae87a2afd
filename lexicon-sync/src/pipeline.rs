//! Shared import/export/report pipeline used by the CLI.
//!
//! The loops here are batch-tolerant by design: one malformed or vanished
//! file becomes a `Failed` entry and the rest of the batch proceeds.

use std::path::{Path, PathBuf};

use lexicon_core::{EntityStore, ItemKey, DICTIONARY_ITEM_KIND};

use crate::audit::AuditLog;
use crate::changes::{get_changes, Change, ChangeKind};
use crate::codec::{self, REDIRECT_FILE};
use crate::error::SyncError;
use crate::paths::FolderLayout;
use crate::reconcile::Reconciler;
use crate::serializer;
use crate::staleness::is_stale;

/// Outcome of exporting one root item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEntry {
    /// The document was written (new or changed content).
    Written { path: PathBuf, name: String },
    /// The on-disk document already matches live state.
    Unchanged { path: PathBuf, name: String },
    Failed { name: String, reason: String },
}

/// Outcome of importing one document file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEntry {
    Imported {
        path: PathBuf,
        key: ItemKey,
        name: String,
    },
    Failed {
        path: PathBuf,
        reason: String,
    },
}

/// Outcome of checking one document file against live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    /// Document matches live state.
    Current { path: PathBuf, name: String },
    /// Document differs; the field-level changes an import would apply.
    Stale {
        path: PathBuf,
        name: String,
        changes: Vec<Change>,
    },
    /// No live item matches; an import would create it.
    New { path: PathBuf, name: String },
    Failed { path: PathBuf, reason: String },
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Serialize every root item to its document path, skipping writes whose
/// on-disk document is already current, and reconcile orphans left behind
/// by renames.
pub fn export_store<S: EntityStore + ?Sized>(
    store: &S,
    layout: &FolderLayout,
    audit: &mut dyn AuditLog,
) -> Result<Vec<ExportEntry>, SyncError> {
    let archiver = layout.archiver();
    let mut entries = Vec::new();

    for root in store.roots()? {
        let name = root.logical_name.clone();
        let doc = match serializer::serialize(store, &root) {
            Ok(doc) => doc,
            Err(e) => {
                entries.push(ExportEntry::Failed {
                    name,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let path = layout.document_path(&doc.kind, &root.logical_name);
        if path.exists() {
            if let Ok(existing) = codec::load(&path) {
                if !is_stale(store, &existing) {
                    entries.push(ExportEntry::Unchanged { path, name });
                    continue;
                }
            }
        }

        if let Err(e) = codec::save(&path, &doc) {
            entries.push(ExportEntry::Failed {
                name,
                reason: e.to_string(),
            });
            continue;
        }

        // A rename leaves the previous document behind under the old alias;
        // heal the tree now that the canonical file exists.
        let mut reconciler = Reconciler::new(&archiver, audit);
        reconciler.reconcile(&layout.type_root(&doc.kind), root.key, &path, true);

        entries.push(ExportEntry::Written { path, name });
    }

    Ok(entries)
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Import every document under the dictionary type root, reconciling each
/// imported identity against the path that was just read.
pub fn import_folder<S: EntityStore + ?Sized>(
    store: &mut S,
    layout: &FolderLayout,
    audit: &mut dyn AuditLog,
) -> Result<Vec<ImportEntry>, SyncError> {
    let type_root = layout.type_root(DICTIONARY_ITEM_KIND);
    let archiver = layout.archiver();
    let mut entries = Vec::new();

    for file in collect_documents(&type_root) {
        // A file listed at scan time may have been archived by an earlier
        // reconciliation in this same batch.
        if !file.exists() {
            continue;
        }

        let doc = match codec::load(&file) {
            Ok(doc) => doc,
            Err(e) => {
                entries.push(ImportEntry::Failed {
                    path: file,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match serializer::deserialize(store, &doc) {
            Ok(outcome) => {
                let mut reconciler = Reconciler::new(&archiver, audit);
                reconciler.reconcile(&type_root, outcome.key, &file, true);
                entries.push(ImportEntry::Imported {
                    path: file,
                    key: outcome.key,
                    name: outcome.name,
                });
            }
            Err(e) => {
                entries.push(ImportEntry::Failed {
                    path: file,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(entries)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Read-only staleness and change report for every document under the
/// dictionary type root.
pub fn report_folder<S: EntityStore + ?Sized>(
    store: &S,
    layout: &FolderLayout,
) -> Result<Vec<ReportEntry>, SyncError> {
    let type_root = layout.type_root(DICTIONARY_ITEM_KIND);
    let mut entries = Vec::new();

    for file in collect_documents(&type_root) {
        let doc = match codec::load(&file) {
            Ok(doc) => doc,
            Err(e) => {
                entries.push(ReportEntry::Failed {
                    path: file,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let name = doc.key.clone();
        if !is_stale(store, &doc) {
            entries.push(ReportEntry::Current { path: file, name });
            continue;
        }

        let changes = get_changes(store, &doc);
        if changes.len() == 1 && changes[0].kind == ChangeKind::NewItem {
            entries.push(ReportEntry::New { path: file, name });
        } else {
            entries.push(ReportEntry::Stale {
                path: file,
                name,
                changes,
            });
        }
    }

    Ok(entries)
}

/// Depth-first sorted listing of document files under `dir`, excluding
/// redirect markers.
fn collect_documents(dir: &Path) -> Vec<PathBuf> {
    fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        paths.sort();
        for path in paths {
            if path.is_dir() {
                walk(&path, out);
            } else if codec::is_document(&path)
                && path
                    .file_name()
                    .map(|n| n != std::ffi::OsStr::new(REDIRECT_FILE))
                    .unwrap_or(false)
            {
                out.push(path);
            }
        }
    }

    let mut out = Vec::new();
    walk(dir, &mut out);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
