//! Log directory preparation.

use crate::{RenderError, RenderResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What a reset did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetSummary {
    /// The directory did not exist and was created.
    pub created: bool,
    /// Entries deleted.
    pub removed: usize,
    /// Marker files preserved.
    pub kept: usize,
}

/// Directory holding render logs from the current run only.
#[derive(Debug, Clone)]
pub struct LogDirectory {
    path: PathBuf,
}

impl LogDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Empty the directory, keeping files named `keep_marker`.
    ///
    /// Creates the directory when it does not exist yet.
    pub fn reset(&self, keep_marker: &str) -> RenderResult<ResetSummary> {
        let mut summary = ResetSummary::default();

        if !self.path.exists() {
            fs::create_dir_all(&self.path)?;
            summary.created = true;
            return Ok(summary);
        }
        if !self.path.is_dir() {
            return Err(RenderError::NotADirectory {
                path: self.path.clone(),
            });
        }

        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_file() && entry.file_name() == keep_marker {
                summary.kept += 1;
                continue;
            }

            let path = entry.path();
            if file_type.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
            debug!(path = %path.display(), "removed stale log entry");
            summary.removed += 1;
        }
        Ok(summary)
    }
}
