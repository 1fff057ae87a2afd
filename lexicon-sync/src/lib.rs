//! # lexicon-sync
//!
//! File-backed synchronization engine for dictionary trees.
//!
//! Call [`serializer::deserialize`] to import a document into a store and
//! [`Reconciler::reconcile`] afterwards to heal any file a rename left
//! behind; [`staleness::is_stale`] and [`changes::get_changes`] decide
//! whether an export is needed before writing. [`pipeline`] wires the same
//! pieces into whole-folder import/export/report runs.

pub mod archive;
pub mod audit;
pub mod changes;
pub mod codec;
pub mod error;
pub mod paths;
pub mod pipeline;
pub mod reconcile;
pub mod serializer;
pub mod staleness;

pub use archive::{Archiver, FileArchiver};
pub use audit::{AuditLog, FileAuditLog, MemoryAuditLog, RenameAction};
pub use changes::{get_changes, Change, ChangeKind};
pub use error::SyncError;
pub use paths::FolderLayout;
pub use pipeline::{
    export_store, import_folder, report_folder, ExportEntry, ImportEntry, ReportEntry,
};
pub use reconcile::Reconciler;
pub use serializer::{deserialize, serialize, ImportOutcome};
pub use staleness::is_stale;
