//! Folder layout — where document trees and archives live on disk.
//!
//! # Storage layout
//!
//! ```text
//! <root>/
//!   data/
//!     dictionary-item/
//!       <Name>.lex.yaml      (one document tree per root item)
//!   archive/
//!     dictionary-item/
//!       <Name>_<stamp>.lex.yaml
//! ```

use std::path::{Path, PathBuf};

use crate::archive::FileArchiver;
use crate::codec::DOCUMENT_SUFFIX;

/// Resolves type-tag folders and document paths under a fixed pair of roots.
#[derive(Debug, Clone)]
pub struct FolderLayout {
    data_root: PathBuf,
    archive_root: PathBuf,
}

impl FolderLayout {
    pub fn new(data_root: impl Into<PathBuf>, archive_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            archive_root: archive_root.into(),
        }
    }

    /// Conventional layout under a single root: `<root>/data` + `<root>/archive`.
    #[must_use]
    pub fn at(root: &Path) -> Self {
        Self::new(root.join("data"), root.join("archive"))
    }

    #[must_use]
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Scan root for documents of a node type.
    #[must_use]
    pub fn type_root(&self, kind: &str) -> PathBuf {
        self.data_root.join(safe_file_name(kind))
    }

    /// Canonical path of the document tree rooted at `logical_name`.
    #[must_use]
    pub fn document_path(&self, kind: &str, logical_name: &str) -> PathBuf {
        self.type_root(kind)
            .join(format!("{}{DOCUMENT_SUFFIX}", safe_file_name(logical_name)))
    }

    /// An archiver that mirrors this layout under the archive root.
    #[must_use]
    pub fn archiver(&self) -> FileArchiver {
        FileArchiver::new(&self.data_root, &self.archive_root)
    }
}

/// Make a logical name safe to use as a file name.
///
/// Path separators, reserved characters, and control characters become
/// `_`; leading dots are stripped so no document hides as a dotfile.
#[must_use]
pub fn safe_file_name(name: &str) -> String {
    const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

    let cleaned: String = name
        .chars()
        .map(|c| {
            if RESERVED.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.').trim();
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}
