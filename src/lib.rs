//! fmq: query and modify YAML frontmatter in markdown notes
//!
//! The library splits a note into its frontmatter block and body, runs a
//! jq-style expression against the frontmatter and, for mutations, splices
//! the result back in front of the untouched body.
//!
//! # Quick Start
//!
//! ## Querying
//!
//! ```rust
//! use fmq::{Processor, YqEvaluator};
//!
//! let doc = "---\ntitle: Test\nauthor: Jane\n---\n\n# Body content";
//! let processor = Processor::new(YqEvaluator::new());
//! assert_eq!(processor.run(".title", doc, false).unwrap(), "Test\n");
//! ```
//!
//! ## Mutating
//!
//! ```rust
//! use fmq::{apply, ExpressionKind, Outcome, YqEvaluator};
//!
//! let doc = "---\ntitle: Old\n---\n\n# Heading\n";
//! let outcome = apply(YqEvaluator::new(), ".title = \"New\"", ExpressionKind::Mutation, doc)?;
//! assert_eq!(outcome, Outcome::Modified("---\ntitle: New\n---\n\n# Heading\n".to_string()));
//! # Ok::<(), fmq::FmqError>(())
//! ```
//!
//! ## Editing notes on disk
//!
//! ```rust,no_run
//! use fmq::{Mode, NoteOps, NoteReader, NoteResolver, NoteWriter, WriteOptions, YqEvaluator};
//!
//! fn main() -> fmq::Result<()> {
//!     let path = NoteResolver::new("vault").resolve("projects/plan")?;
//!     let ops = NoteOps::new(YqEvaluator::new(), NoteReader::new(), NoteWriter::new())?;
//!     ops.edit_note(&path, ".status = \"done\"", Mode::Auto, &WriteOptions::default())?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: extraction, expression classification, the evaluator seam and
//!   the jq-compatible evaluator
//! - [`ops`]: the query-or-mutate state machine for a note
//! - [`io`]: locating vaults, resolving, reading and atomically writing notes
//! - [`error`]: error types

pub use crate::error::{FmqError, Result, ValidationError};

pub use crate::core::{
    classify, evaluate_expression, extract, has_comments, reconstruct, Classifier,
    EvaluationError, Evaluator, ExpressionKind, ExtractionResult, Mode, Processor, YqEvaluator,
};

pub use crate::io::{
    BackupOptions, Note, NoteReader, NoteResolver, NoteWriter, OutputOptions, ReaderConfig,
    ResolverConfig, VaultLocator, WriteOptions, WriteResult, WriterConfig,
};

pub use crate::ops::{apply, EditReport, NoteOps, Outcome, ValidationReport};

pub mod core;
pub mod error;
pub mod io;
pub mod ops;

/// Convenience functions for common operations
pub mod convenience {
    //! One-call helpers using the default evaluator and default settings

    use crate::core::{Classifier, Mode, Processor, YqEvaluator};
    use crate::io::{NoteReader, NoteWriter, WriteOptions};
    use crate::ops::{EditReport, NoteOps};
    use crate::Result;
    use std::path::Path;

    /// Evaluate a query against a document's frontmatter
    pub fn query(expression: &str, document: &str) -> Result<String> {
        Processor::new(YqEvaluator::new()).run(expression, document, false)
    }

    /// Apply a mutation and return the complete rewritten document
    pub fn mutate(expression: &str, document: &str) -> Result<String> {
        Processor::new(YqEvaluator::new()).run(expression, document, true)
    }

    /// Classify an expression and run it against the note at `path`
    pub fn edit_file<P: AsRef<Path>>(path: P, expression: &str) -> Result<EditReport> {
        let ops = NoteOps::new(YqEvaluator::new(), NoteReader::new(), NoteWriter::new())?;
        ops.edit_note(path.as_ref(), expression, Mode::Auto, &WriteOptions::default())
    }

    /// Whether `expression` would rewrite frontmatter
    pub fn is_mutation(expression: &str) -> Result<bool> {
        Ok(Classifier::new()?.classify(expression).is_mutation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_convenience_query_and_mutate() {
        let doc = "---\ntitle: Test\n---\nBody\n";
        assert_eq!(convenience::query(".title", doc).unwrap(), "Test\n");
        assert_eq!(
            convenience::mutate(".draft = true", doc).unwrap(),
            "---\ntitle: Test\ndraft: true\n---\nBody\n"
        );
        assert!(convenience::is_mutation("del(.x)").unwrap());
        assert!(!convenience::is_mutation(".x == 1").unwrap());
    }

    #[test]
    fn test_convenience_edit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "# No frontmatter yet\n").unwrap();

        let report = convenience::edit_file(&path, ".tags = [\"rust\"]").unwrap();
        assert_eq!(report.kind, ExpressionKind::Mutation);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "---\ntags:\n- rust\n---\n# No frontmatter yet\n"
        );
    }
}
