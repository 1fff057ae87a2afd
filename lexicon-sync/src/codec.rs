//! Document codec — file I/O and content hashing for structured documents.
//!
//! ## `save` — write protocol
//!
//! 1. Clone the document, clear non-semantic fields, compute the canonical
//!    SHA-256 content hash.
//! 2. Embed the hash in the clone.
//! 3. Serialize to YAML, write to a `.tmp` sibling.
//! 4. Rename to the final path (atomic on POSIX).
//!
//! Loads are strict about YAML shape ([`load`]) where the caller asked for a
//! document, and maximally tolerant where the caller is only probing for an
//! identity ([`probe_identity`]) — a rogue file from another schema era must
//! still be findable, and an unreadable one must never abort a walk.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use lexicon_core::{document, DictDocument, ItemKey};

use crate::error::{io_err, SyncError};

/// Reserved suffix for structured document files. Only files carrying it
/// participate in identity scanning.
pub const DOCUMENT_SUFFIX: &str = ".lex.yaml";

/// Redirect marker file name; becomes meaningless once the canonical file
/// for an identity has moved.
pub const REDIRECT_FILE: &str = "redirect.lex.yaml";

/// True when `path` names a structured document file.
#[must_use]
pub fn is_document(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(DOCUMENT_SUFFIX))
        .unwrap_or(false)
}

/// Load a structured document from `path`.
pub fn load(path: &Path) -> Result<DictDocument, SyncError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| SyncError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save a structured document to `path` with its content hash embedded.
///
/// Creates parent directories; writes via `.tmp` sibling + rename.
pub fn save(path: &Path, doc: &DictDocument) -> Result<(), SyncError> {
    let mut stamped = doc.clone();
    stamped.hash = Some(content_hash(doc)?);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let yaml = serde_yaml::to_string(&stamped)?;
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    tracing::debug!("wrote document: {}", path.display());
    Ok(())
}

/// Canonical content hash of a document: SHA-256 hex over the YAML
/// serialization with the recorded hash and the archival flag cleared.
///
/// Two documents with identical semantic content produce identical digests;
/// this is load-bearing for change detection.
pub fn content_hash(doc: &DictDocument) -> Result<String, SyncError> {
    let mut canonical = doc.clone();
    canonical.hash = None;
    canonical.archived = false;

    let yaml = serde_yaml::to_string(&canonical)?;
    let mut hasher = Sha256::new();
    hasher.update(yaml.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Tolerant multi-strategy identity extraction from a document file.
///
/// Missing file, malformed YAML, and no-strategy-hit all yield `None`;
/// a candidate that cannot be read is simply "not a match".
#[must_use]
pub fn probe_identity(path: &Path) -> Option<ItemKey> {
    let contents = std::fs::read_to_string(path).ok()?;
    let value: serde_yaml::Value = serde_yaml::from_str(&contents).ok()?;
    document::probe_identity(&value)
}
