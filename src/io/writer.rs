//! Persisting rewritten notes
//!
//! Writes go through a temporary file in the target directory that is then
//! renamed over the note, so readers never observe a half-written file.
//! Identical content is never rewritten.

use crate::error::{FmqError, Result};
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Suffix used for backups when none is configured
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// Configuration for the note writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Create backup files before writing
    pub backup_enabled: bool,
    /// Backup file suffix (e.g., ".bak")
    pub backup_suffix: Option<String>,
    /// Backup directory (if None, backups go in same directory)
    pub backup_dir: Option<PathBuf>,
    /// Use atomic writes (write to temp file first, then rename)
    pub atomic_writes: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            backup_enabled: false,
            backup_suffix: None,
            backup_dir: None,
            atomic_writes: true,
        }
    }
}

/// Per-call overrides of the writer configuration
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Override backup settings for this operation
    pub backup: Option<BackupOptions>,
    /// Where the content goes; in place when unset
    pub output: Option<OutputOptions>,
    /// Dry run - generate diff without writing
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BackupOptions {
    pub enabled: bool,
    pub suffix: Option<String>,
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputOptions {
    /// Replace the original note (default)
    InPlace,
    /// Print the rewritten note instead of saving it
    Stdout,
}

/// What a write did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteResult {
    /// Whether the content differed from the original
    pub modified: bool,
    /// Path written to (None for stdout and dry runs)
    pub output_path: Option<PathBuf>,
    /// Path of backup file if created
    pub backup_path: Option<PathBuf>,
    /// Unified-style diff, produced for dry runs
    pub diff: Option<String>,
}

/// Writes notes back to disk
#[derive(Debug, Clone, Default)]
pub struct NoteWriter {
    config: WriterConfig,
}

impl NoteWriter {
    /// Create a new writer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new writer with custom configuration
    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Persist `new_content` for the note at `path`, whose current text is
    /// `original`.
    pub fn write(
        &self,
        path: &Path,
        original: &str,
        new_content: &str,
        options: &WriteOptions,
    ) -> Result<WriteResult> {
        let modified = original != new_content;

        if options.dry_run {
            return Ok(WriteResult {
                modified,
                diff: generate_diff(original, new_content, path),
                ..Default::default()
            });
        }

        if !modified {
            debug!("{} is unchanged, skipping write", path.display());
            return Ok(WriteResult::default());
        }

        match options.output.as_ref().unwrap_or(&OutputOptions::InPlace) {
            OutputOptions::Stdout => {
                print!("{new_content}");
                Ok(WriteResult {
                    modified,
                    ..Default::default()
                })
            }
            OutputOptions::InPlace => {
                let backup_path = if self.should_create_backup(options) {
                    Some(self.create_backup(path, options)?)
                } else {
                    None
                };
                self.write_to_file(path, new_content)?;
                info!("Updated {}", path.display());
                Ok(WriteResult {
                    modified,
                    output_path: Some(path.to_path_buf()),
                    backup_path,
                    diff: None,
                })
            }
        }
    }

    fn write_to_file(&self, path: &Path, content: &str) -> Result<()> {
        if self.config.atomic_writes {
            write_atomic(path, content)
        } else {
            fs::write(path, content).map_err(|e| map_write_error(e, path))
        }
    }

    fn should_create_backup(&self, options: &WriteOptions) -> bool {
        options
            .backup
            .as_ref()
            .map_or(self.config.backup_enabled, |b| b.enabled)
    }

    fn create_backup(&self, original: &Path, options: &WriteOptions) -> Result<PathBuf> {
        let (suffix, directory) = match &options.backup {
            Some(b) => (b.suffix.as_deref(), b.directory.as_ref()),
            None => (
                self.config.backup_suffix.as_deref(),
                self.config.backup_dir.as_ref(),
            ),
        };
        let suffix = suffix.unwrap_or(DEFAULT_BACKUP_SUFFIX);

        let file_name = original
            .file_name()
            .ok_or_else(|| FmqError::backup("could not extract filename for backup"))?;
        let backup_name = format!("{}{}", file_name.to_string_lossy(), suffix);

        let backup_path = match directory {
            Some(dir) => {
                fs::create_dir_all(dir).map_err(|e| {
                    FmqError::backup(format!("could not create backup directory: {e}"))
                })?;
                dir.join(backup_name)
            }
            None => original.with_file_name(backup_name),
        };

        fs::copy(original, &backup_path)
            .map_err(|e| FmqError::backup(format!("failed to create backup: {e}")))?;
        debug!("Backed up {} to {}", original.display(), backup_path.display());

        Ok(backup_path)
    }
}

/// Write through a temp file in the same directory, keeping the
/// permissions of any file being replaced
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| map_write_error(e, path))?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(path)
        .map_err(|e| map_write_error(e.error, path))?;
    Ok(())
}

fn map_write_error(err: std::io::Error, path: &Path) -> FmqError {
    match err.kind() {
        std::io::ErrorKind::PermissionDenied => FmqError::permission_denied(path),
        _ => FmqError::Io(err),
    }
}

/// Line diff trimmed to the changed middle section
pub fn generate_diff(old: &str, new: &str, path: &Path) -> Option<String> {
    if old == new {
        return None;
    }

    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let prefix = old_lines
        .iter()
        .zip(&new_lines)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_lines[prefix..]
        .iter()
        .rev()
        .zip(new_lines[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let removed = &old_lines[prefix..old_lines.len() - suffix];
    let added = &new_lines[prefix..new_lines.len() - suffix];
    if removed.is_empty() && added.is_empty() {
        // Only a trailing newline changed
        return None;
    }

    let mut out = vec![
        format!("--- {}", path.display()),
        format!("+++ {}", path.display()),
        format!(
            "@@ -{},{} +{},{} @@",
            prefix + 1,
            removed.len(),
            prefix + 1,
            added.len()
        ),
    ];
    out.extend(removed.iter().map(|l| format!("-{l}")));
    out.extend(added.iter().map(|l| format!("+{l}")));
    Some(out.join("\n"))
}
