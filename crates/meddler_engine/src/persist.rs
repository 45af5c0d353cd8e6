//! Output persistence.
//!
//! All writes go through [`AtomicFileWriter`]: write a temp file next to
//! the target, then rename. Output paths nest (`content/posts/x/index.md`),
//! so parent directories are created on demand.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Atomically writes files under a base directory by writing a temp file
/// then renaming.
pub struct AtomicFileWriter {
    base: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    /// Writes text content to `{base}/{rel}`, creating parent directories.
    pub fn write(&self, rel: &Path, content: &str) -> Result<PathBuf, PersistError> {
        self.write_bytes(rel, content.as_bytes())
    }

    /// Writes raw bytes to `{base}/{rel}`, creating parent directories.
    pub fn write_bytes(&self, rel: &Path, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        let target = self.base.join(rel);
        let parent = target
            .parent()
            .ok_or_else(|| PersistError::OutputDir("target has no parent".into()))?;
        ensure_output_dir(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing file if present to keep determinism.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
