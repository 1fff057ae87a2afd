//! Archiver — non-destructive removal of superseded document files.
//!
//! Reconciliation never deletes an orphan outright; it moves the file under
//! an archive root, preserving its path relative to the data root and
//! stamping the name so repeated archivals of the same logical file never
//! collide. Archived content stays recoverable.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::codec::DOCUMENT_SUFFIX;
use crate::error::{io_err, SyncError};

/// Moves superseded files to a recovery location.
pub trait Archiver {
    /// Archive `path`, returning where the file ended up.
    fn archive(&self, path: &Path) -> Result<PathBuf, SyncError>;
}

/// Filesystem archiver rooted at `archive_root`.
#[derive(Debug, Clone)]
pub struct FileArchiver {
    data_root: PathBuf,
    archive_root: PathBuf,
}

impl FileArchiver {
    pub fn new(data_root: impl Into<PathBuf>, archive_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            archive_root: archive_root.into(),
        }
    }

    fn destination(&self, path: &Path) -> PathBuf {
        let relative = path
            .strip_prefix(&self.data_root)
            .unwrap_or_else(|_| Path::new(path.file_name().unwrap_or(path.as_os_str())));

        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stamp = Utc::now().format("%Y%m%dT%H%M%S");
        let stamped = match file_name.strip_suffix(DOCUMENT_SUFFIX) {
            Some(stem) => format!("{stem}_{stamp}{DOCUMENT_SUFFIX}"),
            None => format!("{file_name}_{stamp}"),
        };

        let parent = relative.parent().unwrap_or_else(|| Path::new(""));
        self.archive_root.join(parent).join(stamped)
    }
}

impl Archiver for FileArchiver {
    fn archive(&self, path: &Path) -> Result<PathBuf, SyncError> {
        let mut dest = self.destination(path);

        // Same-second archival of the same name gets a numeric suffix.
        let mut attempt = 1;
        while dest.exists() {
            let base = self.destination(path);
            let name = base
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            dest = base.with_file_name(match name.strip_suffix(DOCUMENT_SUFFIX) {
                Some(stem) => format!("{stem}-{attempt}{DOCUMENT_SUFFIX}"),
                None => format!("{name}-{attempt}"),
            });
            attempt += 1;
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }

        // Rename when possible; fall back to copy + remove across filesystems.
        if std::fs::rename(path, &dest).is_err() {
            std::fs::copy(path, &dest).map_err(|e| io_err(path, e))?;
            std::fs::remove_file(path).map_err(|e| io_err(path, e))?;
        }

        tracing::info!("archived {} -> {}", path.display(), dest.display());
        Ok(dest)
    }
}
