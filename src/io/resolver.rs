//! Note resolution inside a vault directory
//!
//! A note name like `projects/plan` resolves to `<vault>/projects/plan.md`.
//! When that file does not exist the vault is searched for a unique note
//! whose trailing path components match the name.

use crate::error::{FmqError, Result};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extension appended to note names that lack one
pub const NOTE_EXTENSION: &str = "md";

/// Configuration for note resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Directory note names are resolved against
    pub vault: PathBuf,
    /// Follow symbolic links while searching
    pub follow_links: bool,
    /// Maximum recursion depth for the fallback search
    pub max_depth: Option<usize>,
    /// Include hidden files and directories (starting with .)
    pub include_hidden: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            vault: PathBuf::from("."),
            follow_links: false,
            max_depth: None,
            include_hidden: false,
        }
    }
}

/// Maps note names to files
#[derive(Debug, Clone, Default)]
pub struct NoteResolver {
    config: ResolverConfig,
}

impl NoteResolver {
    /// Create a resolver for `vault` with default settings
    pub fn new(vault: impl Into<PathBuf>) -> Self {
        Self::with_config(ResolverConfig {
            vault: vault.into(),
            ..Default::default()
        })
    }

    /// Create a new resolver with custom configuration
    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn vault(&self) -> &Path {
        &self.config.vault
    }

    /// Resolve a note name to an existing file
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FmqError::validation("note name must not be empty"));
        }

        let relative = add_md_suffix(name);
        let direct = self.config.vault.join(&relative);
        if direct.is_file() {
            debug!("Resolved '{}' to {}", name, direct.display());
            return Ok(direct);
        }

        debug!(
            "{} does not exist, searching {}",
            direct.display(),
            self.config.vault.display()
        );

        let mut matches: Vec<PathBuf> = self
            .walk()
            .filter(|path| path.ends_with(&relative))
            .collect();

        match matches.len() {
            0 => Err(FmqError::note_not_found(direct)),
            1 => Ok(matches.remove(0)),
            _ => {
                matches.sort();
                let candidates: Vec<String> =
                    matches.iter().map(|p| p.display().to_string()).collect();
                Err(FmqError::validation(format!(
                    "note name '{}' is ambiguous: {}",
                    name,
                    candidates.join(", ")
                )))
            }
        }
    }

    /// Every markdown note in the vault, sorted by path
    pub fn all_notes(&self) -> Vec<PathBuf> {
        let mut notes: Vec<PathBuf> = self.walk().filter(|p| is_markdown_file(p)).collect();
        notes.sort();
        notes
    }

    fn walk(&self) -> impl Iterator<Item = PathBuf> + '_ {
        let include_hidden = self.config.include_hidden;
        WalkDir::new(&self.config.vault)
            .follow_links(self.config.follow_links)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .into_iter()
            .filter_entry(move |entry| include_hidden || entry.depth() == 0 || !is_hidden(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!("Skipping unreadable entry: {}", err);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(DirEntry::into_path)
    }
}

/// Append `.md` unless the name already ends with it
pub fn add_md_suffix(name: &str) -> String {
    let suffix = format!(".{NOTE_EXTENSION}");
    if name.ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

/// Check if a file is a markdown file based on extension
pub fn is_markdown_file(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext_str = ext.to_string_lossy().to_lowercase();
            matches!(ext_str.as_str(), "md" | "markdown")
        }
        None => false,
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn vault(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "---\ntitle: x\n---\n").unwrap();
        }
        dir
    }

    #[test]
    fn test_add_md_suffix() {
        assert_eq!(add_md_suffix("note"), "note.md");
        assert_eq!(add_md_suffix("note.md"), "note.md");
        assert_eq!(add_md_suffix("dir/note"), "dir/note.md");
    }

    #[test]
    fn test_resolve_direct() {
        let dir = vault(&["note.md", "projects/plan.md"]);
        let resolver = NoteResolver::new(dir.path());

        assert_eq!(resolver.resolve("note").unwrap(), dir.path().join("note.md"));
        assert_eq!(
            resolver.resolve("projects/plan.md").unwrap(),
            dir.path().join("projects/plan.md")
        );
    }

    #[test]
    fn test_resolve_by_search() {
        let dir = vault(&["deep/nested/idea.md"]);
        let resolver = NoteResolver::new(dir.path());

        assert_eq!(
            resolver.resolve("idea").unwrap(),
            dir.path().join("deep/nested/idea.md")
        );
        assert_eq!(
            resolver.resolve("nested/idea").unwrap(),
            dir.path().join("deep/nested/idea.md")
        );
    }

    #[test]
    fn test_resolve_ambiguous() {
        let dir = vault(&["a/todo.md", "b/todo.md"]);
        let err = NoteResolver::new(dir.path()).resolve("todo").unwrap_err();
        assert!(matches!(err, FmqError::Validation { .. }));
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn test_resolve_missing_and_hidden() {
        let dir = vault(&[".trash/gone.md"]);
        let resolver = NoteResolver::new(dir.path());

        let err = resolver.resolve("gone").unwrap_err();
        assert!(matches!(err, FmqError::NoteNotFound { .. }));

        let err = resolver.resolve("  ").unwrap_err();
        assert!(matches!(err, FmqError::Validation { .. }));
    }

    #[test]
    fn test_all_notes() {
        let dir = vault(&["b.md", "a/c.md", ".obsidian/hidden.md"]);
        fs::write(dir.path().join("image.png"), "").unwrap();

        let notes = NoteResolver::new(dir.path()).all_notes();
        assert_eq!(
            notes,
            vec![dir.path().join("a/c.md"), dir.path().join("b.md")]
        );
    }
}
