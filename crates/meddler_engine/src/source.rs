//! Read access to an extracted Medium export.
//!
//! The trait is the seam for alternative backends (an archive extractor,
//! an in-memory fixture). Directory listings are always returned
//! filename-sorted: pagination order across `*-NNNN.html` files depends
//! on it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::decode::decode_html;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Read-side access to one export root.
pub trait ExportSource {
    /// True when the relative path exists.
    fn exists(&self, rel: &str) -> bool;

    /// Filenames (not paths) of the `.html` files directly inside `subdir`,
    /// sorted. A missing directory is an empty listing, not an error.
    fn list_html_files(&self, subdir: &str) -> Result<Vec<String>, SourceError>;

    /// Reads one file as text, decoding legacy charsets when necessary.
    fn read_to_string(&self, rel: &str) -> Result<String, SourceError>;
}

/// Export rooted in a local directory.
#[derive(Debug, Clone)]
pub struct DirExportSource {
    root: PathBuf,
}

impl DirExportSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ExportSource for DirExportSource {
    fn exists(&self, rel: &str) -> bool {
        self.root.join(rel).exists()
    }

    fn list_html_files(&self, subdir: &str) -> Result<Vec<String>, SourceError> {
        let dir = self.root.join(subdir);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".html"))
            .collect();
        names.sort();
        Ok(names)
    }

    fn read_to_string(&self, rel: &str) -> Result<String, SourceError> {
        let bytes = fs::read(self.root.join(rel))?;
        Ok(decode_html(&bytes).html)
    }
}
