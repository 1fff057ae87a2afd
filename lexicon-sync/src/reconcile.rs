//! Orphan file reconciliation.
//!
//! Files are named by mutable logical aliases while items are tracked by
//! immutable keys, so a rename can leave two files on disk for one
//! identity. After a file has been (re)written for a key, the reconciler
//! scans the type's folder tree for any *other* document carrying the same
//! key and heals the layout: child folders move under the new file's
//! directory, the rogue file is archived, a stale redirect marker is
//! dropped, and an emptied directory is removed.
//!
//! The walk mutates the tree it is walking — orphan handling can delete
//! the very directory being scanned. Each directory therefore gets a
//! two-phase pass: process its files, re-check that the directory still
//! exists, only then descend into subdirectories.

use std::path::{Path, PathBuf};

use lexicon_core::ItemKey;

use crate::archive::Archiver;
use crate::audit::AuditLog;
use crate::codec::{self, REDIRECT_FILE};
use crate::error::SyncError;

/// Heals the one-file-per-identity invariant after a write.
///
/// Collaborators are injected; the reconciler holds no global state.
pub struct Reconciler<'a> {
    archiver: &'a dyn Archiver,
    audit: &'a mut dyn AuditLog,
}

impl<'a> Reconciler<'a> {
    pub fn new(archiver: &'a dyn Archiver, audit: &'a mut dyn AuditLog) -> Self {
        Self { archiver, audit }
    }

    /// Scan `root` for documents other than `new_file` carrying `key` and
    /// remove them.
    ///
    /// A non-existent `root` and a nil `key` are silent no-ops. Individual
    /// file failures are swallowed: one unreadable file must not block
    /// reconciliation of the rest of the tree.
    pub fn reconcile(&mut self, root: &Path, key: ItemKey, new_file: &Path, record_rename: bool) {
        if key.is_nil() || !root.is_dir() {
            return;
        }
        tracing::debug!(
            "reconciling orphans under {} for {key} (new file {})",
            root.display(),
            new_file.display()
        );
        self.check_folder(root, key, new_file, record_rename);
    }

    /// [`Self::reconcile`] for integer-keyed item types: the id widens into
    /// the shared identity space; ids that do not fit are a no-op.
    pub fn reconcile_numeric(
        &mut self,
        root: &Path,
        id: i64,
        new_file: &Path,
        record_rename: bool,
    ) {
        if let Some(key) = ItemKey::from_numeric(id) {
            self.reconcile(root, key, new_file, record_rename);
        }
    }

    fn check_folder(&mut self, folder: &Path, key: ItemKey, new_file: &Path, record_rename: bool) {
        // Phase one: candidate files in this directory.
        for file in list_sorted(folder, |p| p.is_file() && codec::is_document(p)) {
            if same_file(&file, new_file) {
                continue;
            }
            if codec::probe_identity(&file) == Some(key) {
                if let Err(e) = self.handle_orphan(&file, key, new_file, record_rename) {
                    tracing::warn!("orphan handling failed for {}: {e}", file.display());
                }
            }
        }

        // Phase two: orphan handling may have deleted this directory (or
        // moved its subdirectories); re-check before descending.
        if !folder.is_dir() {
            return;
        }
        for dir in list_sorted(folder, |p| p.is_dir()) {
            self.check_folder(&dir, key, new_file, record_rename);
        }
    }

    fn handle_orphan(
        &mut self,
        file: &Path,
        key: ItemKey,
        new_file: &Path,
        record_rename: bool,
    ) -> Result<(), SyncError> {
        tracing::info!("found orphan document: {}", file.display());

        let Some(orphan_dir) = file.parent() else {
            return Ok(());
        };
        let Some(target_dir) = new_file.parent() else {
            return Ok(());
        };

        // Child subtrees lived under the old alias path; relocate them
        // before the old location disappears.
        if orphan_dir.is_dir() && target_dir.is_dir() && !same_file(orphan_dir, target_dir) {
            for sub in list_sorted(orphan_dir, |p| p.is_dir()) {
                let Some(name) = sub.file_name() else { continue };
                let dest = target_dir.join(name);
                tracing::debug!("moving child folder {} -> {}", sub.display(), dest.display());
                if let Err(e) = std::fs::rename(&sub, &dest) {
                    tracing::warn!("failed to move child folder {}: {e}", sub.display());
                }
            }
        }

        if record_rename {
            match codec::load(new_file) {
                Ok(doc) if !doc.kind.is_empty() => {
                    let rename_key = codec::probe_identity(new_file).unwrap_or(key);
                    if let Err(e) = self.audit.record_rename(&doc.kind, rename_key, &doc.key) {
                        tracing::warn!("failed to record rename for '{}': {e}", doc.key);
                    }
                }
                Ok(_) => {
                    tracing::debug!(
                        "no type tag on {}; skipping rename record",
                        new_file.display()
                    );
                }
                Err(e) => {
                    tracing::warn!("could not load new document {}: {e}", new_file.display());
                }
            }
        }

        self.archiver.archive(file)?;

        // A redirect pointer is meaningless once the canonical file moved.
        let redirect = orphan_dir.join(REDIRECT_FILE);
        if redirect.exists() {
            if let Err(e) = std::fs::remove_file(&redirect) {
                tracing::warn!("failed to remove redirect marker {}: {e}", redirect.display());
            }
        }

        // Drop the directory once nothing is left in it.
        if let Ok(mut entries) = std::fs::read_dir(orphan_dir) {
            if entries.next().is_none() {
                tracing::debug!("removing empty orphan folder: {}", orphan_dir.display());
                if let Err(e) = std::fs::remove_dir(orphan_dir) {
                    tracing::warn!(
                        "failed to remove orphan folder {}: {e}",
                        orphan_dir.display()
                    );
                }
            }
        }

        Ok(())
    }
}

fn list_sorted(folder: &Path, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(folder) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| keep(p))
        .collect();
    paths.sort();
    paths
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use lexicon_core::DictDocument;

    use crate::archive::FileArchiver;
    use crate::audit::MemoryAuditLog;

    use super::*;

    struct Fixture {
        _tmp: TempDir,
        root: PathBuf,
        archive_root: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let _ = env_logger::builder().is_test(true).try_init();
            let tmp = TempDir::new().expect("tempdir");
            let root = tmp.path().join("data").join("dictionary-item");
            let archive_root = tmp.path().join("archive");
            std::fs::create_dir_all(&root).expect("mkdir");
            Self {
                _tmp: tmp,
                root,
                archive_root,
            }
        }

        fn archiver(&self) -> FileArchiver {
            FileArchiver::new(self.root.parent().unwrap(), &self.archive_root)
        }

        fn write_doc(&self, relative: &str, name: &str, key: ItemKey) -> PathBuf {
            let path = self.root.join(relative);
            let mut doc = DictDocument::named(name);
            doc.guid = Some(key);
            codec::save(&path, &doc).expect("save doc");
            path
        }

        fn documents_with_key(&self, key: ItemKey) -> Vec<PathBuf> {
            fn walk(dir: &Path, key: ItemKey, hits: &mut Vec<PathBuf>) {
                for entry in std::fs::read_dir(dir).into_iter().flatten().flatten() {
                    let path = entry.path();
                    if path.is_dir() {
                        walk(&path, key, hits);
                    } else if codec::is_document(&path)
                        && codec::probe_identity(&path) == Some(key)
                    {
                        hits.push(path);
                    }
                }
            }
            let mut hits = Vec::new();
            walk(&self.root, key, &mut hits);
            hits
        }
    }

    #[test]
    fn rename_archives_the_old_file_and_records_the_action() {
        let fx = Fixture::new();
        let key = ItemKey::new();
        let old = fx.write_doc("Alpha/Alpha.lex.yaml", "Alpha", key);
        let new = fx.write_doc("Beta.lex.yaml", "Beta", key);

        let archiver = fx.archiver();
        let mut audit = MemoryAuditLog::new();
        Reconciler::new(&archiver, &mut audit).reconcile(&fx.root, key, &new, true);

        assert!(!old.exists(), "orphan must be gone from its original path");
        assert!(new.exists(), "new file must be untouched");
        assert!(
            !old.parent().unwrap().exists(),
            "emptied orphan directory must be removed"
        );

        assert_eq!(audit.actions.len(), 1);
        assert_eq!(audit.actions[0].kind, "dictionary-item");
        assert_eq!(audit.actions[0].key, key);
        assert_eq!(audit.actions[0].new_name, "Beta");
    }

    #[test]
    fn orphan_content_is_archived_not_deleted() {
        let fx = Fixture::new();
        let key = ItemKey::new();
        fx.write_doc("Alpha/Alpha.lex.yaml", "Alpha", key);
        let new = fx.write_doc("Beta.lex.yaml", "Beta", key);

        let archiver = fx.archiver();
        let mut audit = MemoryAuditLog::new();
        Reconciler::new(&archiver, &mut audit).reconcile(&fx.root, key, &new, false);

        let mut archived = Vec::new();
        fn walk(dir: &Path, hits: &mut Vec<PathBuf>) {
            for entry in std::fs::read_dir(dir).into_iter().flatten().flatten() {
                let path = entry.path();
                if path.is_dir() {
                    walk(&path, hits);
                } else {
                    hits.push(path);
                }
            }
        }
        walk(&fx.archive_root, &mut archived);
        assert_eq!(archived.len(), 1, "orphan must be recoverable from the archive");
        let recovered = codec::load(&archived[0]).expect("load archived");
        assert_eq!(recovered.key, "Alpha");
    }

    #[test]
    fn orphan_uniqueness_holds_after_reconcile() {
        let fx = Fixture::new();
        let key = ItemKey::new();
        fx.write_doc("Alpha/Alpha.lex.yaml", "Alpha", key);
        fx.write_doc("Gamma/Gamma.lex.yaml", "Gamma", key);
        let new = fx.write_doc("Beta.lex.yaml", "Beta", key);

        let archiver = fx.archiver();
        let mut audit = MemoryAuditLog::new();
        Reconciler::new(&archiver, &mut audit).reconcile(&fx.root, key, &new, false);

        assert_eq!(
            fx.documents_with_key(key),
            vec![new],
            "only the new file may still resolve to the key"
        );
    }

    #[test]
    fn child_folders_relocate_under_the_new_files_directory() {
        let fx = Fixture::new();
        let key = ItemKey::new();
        let child_key = ItemKey::new();
        fx.write_doc("Alpha/Alpha.lex.yaml", "Alpha", key);
        let child = fx.write_doc("Alpha/Children/Child.lex.yaml", "Alpha.Child", child_key);
        let new = fx.write_doc("Beta/Beta.lex.yaml", "Beta", key);

        let archiver = fx.archiver();
        let mut audit = MemoryAuditLog::new();
        Reconciler::new(&archiver, &mut audit).reconcile(&fx.root, key, &new, false);

        let relocated = fx.root.join("Beta").join("Children").join("Child.lex.yaml");
        assert!(relocated.exists(), "child subtree must move to the new location");
        assert!(!child.exists(), "child subtree must not remain at the old location");
        assert!(!fx.root.join("Alpha").exists(), "emptied orphan dir must be gone");
        assert_eq!(codec::probe_identity(&relocated), Some(child_key));
    }

    #[test]
    fn nonexistent_root_is_a_silent_noop() {
        let fx = Fixture::new();
        let archiver = fx.archiver();
        let mut audit = MemoryAuditLog::new();
        Reconciler::new(&archiver, &mut audit).reconcile(
            &fx.root.join("missing"),
            ItemKey::new(),
            &fx.root.join("missing").join("New.lex.yaml"),
            true,
        );
        assert!(audit.actions.is_empty());
    }

    #[test]
    fn the_new_file_is_never_its_own_orphan() {
        let fx = Fixture::new();
        let key = ItemKey::new();
        let new = fx.write_doc("Beta.lex.yaml", "Beta", key);

        let archiver = fx.archiver();
        let mut audit = MemoryAuditLog::new();
        Reconciler::new(&archiver, &mut audit).reconcile(&fx.root, key, &new, true);

        assert!(new.exists());
        assert!(audit.actions.is_empty());
    }

    #[test]
    fn unreadable_candidates_are_skipped_and_the_walk_continues() {
        let fx = Fixture::new();
        let key = ItemKey::new();
        std::fs::write(fx.root.join("broken.lex.yaml"), "key: [unclosed\n").expect("write");
        let old = fx.write_doc("Deep/Alpha.lex.yaml", "Alpha", key);
        let new = fx.write_doc("Beta.lex.yaml", "Beta", key);

        let archiver = fx.archiver();
        let mut audit = MemoryAuditLog::new();
        Reconciler::new(&archiver, &mut audit).reconcile(&fx.root, key, &new, false);

        assert!(!old.exists(), "orphan past the broken file must still be handled");
        assert!(fx.root.join("broken.lex.yaml").exists());
    }

    #[test]
    fn legacy_identity_schemas_are_still_found() {
        let fx = Fixture::new();
        let key = ItemKey::from_numeric(42).expect("widen");
        let legacy = fx.root.join("Old").join("Old.lex.yaml");
        std::fs::create_dir_all(legacy.parent().unwrap()).expect("mkdir");
        // Oldest era kept the identity in the `key` field.
        std::fs::write(&legacy, format!("kind: dictionary-item\nkey: {key}\n"))
            .expect("write");
        let new = fx.write_doc("New.lex.yaml", "New", key);

        let archiver = fx.archiver();
        let mut audit = MemoryAuditLog::new();
        Reconciler::new(&archiver, &mut audit).reconcile(&fx.root, key, &new, false);

        assert!(!legacy.exists(), "legacy-schema orphan must be reconciled");
    }

    #[test]
    fn redirect_marker_is_dropped_with_the_orphan() {
        let fx = Fixture::new();
        let key = ItemKey::new();
        fx.write_doc("Alpha/Alpha.lex.yaml", "Alpha", key);
        let redirect = fx.root.join("Alpha").join(REDIRECT_FILE);
        std::fs::write(&redirect, "kind: redirect\nkey: Alpha\n").expect("write");
        let new = fx.write_doc("Beta.lex.yaml", "Beta", key);

        let archiver = fx.archiver();
        let mut audit = MemoryAuditLog::new();
        Reconciler::new(&archiver, &mut audit).reconcile(&fx.root, key, &new, false);

        assert!(!redirect.exists(), "redirect marker must be removed");
        assert!(!fx.root.join("Alpha").exists());
    }

    #[test]
    fn numeric_ids_reconcile_through_the_widened_identity() {
        let fx = Fixture::new();
        let key = ItemKey::from_numeric(1055).expect("widen");
        let old = fx.write_doc("Alpha/Alpha.lex.yaml", "Alpha", key);
        let new = fx.write_doc("Beta.lex.yaml", "Beta", key);

        let archiver = fx.archiver();
        let mut audit = MemoryAuditLog::new();
        Reconciler::new(&archiver, &mut audit).reconcile_numeric(&fx.root, 1055, &new, false);

        assert!(!old.exists());
    }

    #[test]
    fn out_of_range_numeric_ids_are_a_noop() {
        let fx = Fixture::new();
        let key = ItemKey::new();
        let old = fx.write_doc("Alpha/Alpha.lex.yaml", "Alpha", key);
        let new = fx.write_doc("Beta.lex.yaml", "Beta", key);

        let archiver = fx.archiver();
        let mut audit = MemoryAuditLog::new();
        let mut reconciler = Reconciler::new(&archiver, &mut audit);
        reconciler.reconcile_numeric(&fx.root, 1_000_000_000_000, &new, false);
        reconciler.reconcile_numeric(&fx.root, -7, &new, false);

        assert!(old.exists(), "nothing may be touched for an unwidenable id");
    }

    #[test]
    fn rename_record_skipped_when_the_new_document_has_no_type_tag() {
        let fx = Fixture::new();
        let key = ItemKey::new();
        let old = fx.write_doc("Alpha/Alpha.lex.yaml", "Alpha", key);
        let new = fx.root.join("Beta.lex.yaml");
        std::fs::write(&new, format!("kind: ''\nkey: Beta\nguid: {key}\n")).expect("write");

        let archiver = fx.archiver();
        let mut audit = MemoryAuditLog::new();
        Reconciler::new(&archiver, &mut audit).reconcile(&fx.root, key, &new, true);

        assert!(audit.actions.is_empty(), "no type tag, no rename record");
        assert!(!old.exists(), "archival must still proceed");
    }
}
