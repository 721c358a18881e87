//! Note reading
//!
//! Reads a markdown note into memory after checking that it exists, is a
//! regular file and fits within the configured size limit.

use crate::core::{extract, ExtractionResult};
use crate::error::{FmqError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the note reader
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Maximum file size to read (in bytes)
    pub max_file_size: Option<u64>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: Some(10 * 1024 * 1024), // 10MB default limit
        }
    }
}

/// A note read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub path: PathBuf,
    pub content: String,
}

impl Note {
    /// Split the note into frontmatter and body
    pub fn extract(&self) -> ExtractionResult {
        extract(&self.content)
    }
}

/// Reads notes from the filesystem
#[derive(Debug, Clone, Default)]
pub struct NoteReader {
    config: ReaderConfig,
}

impl NoteReader {
    /// Create a new reader with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new reader with custom configuration
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a note from a file path
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Note> {
        let path = path.as_ref();

        let metadata = fs::metadata(path).map_err(|e| map_io_error(e, path))?;
        if !metadata.is_file() {
            return Err(FmqError::validation(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        if let Some(limit) = self.config.max_file_size {
            if metadata.len() > limit {
                return Err(FmqError::FileTooLarge {
                    path: path.to_path_buf(),
                    size: metadata.len(),
                    limit,
                });
            }
        }

        let content = fs::read_to_string(path).map_err(|e| map_io_error(e, path))?;
        debug!("Read {} bytes from {}", content.len(), path.display());

        Ok(Note {
            path: path.to_path_buf(),
            content,
        })
    }

    /// Get reader configuration
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

fn map_io_error(err: std::io::Error, path: &Path) -> FmqError {
    match err.kind() {
        std::io::ErrorKind::NotFound => FmqError::note_not_found(path),
        std::io::ErrorKind::PermissionDenied => FmqError::permission_denied(path),
        _ => FmqError::Io(err),
    }
}
