//! Note-level operations built on the core pipeline
//!
//! [`apply`] is the command state machine for a single document: query
//! results are returned for printing, mutations are re-validated before
//! anything is persisted. [`NoteOps`] wires it to reading and writing.

use crate::core::{
    extract, has_comments, Classifier, Evaluator, ExpressionKind, Mode, Processor, YqEvaluator,
};
use crate::error::{FmqError, Result, ValidationError};
use crate::io::{NoteReader, NoteWriter, WriteOptions, WriteResult};
use log::{debug, info, warn};
use serde::Serialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Result of running an expression against one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Query output to print verbatim
    Printed(String),
    /// The mutation left the document as it was
    Unchanged,
    /// The rewritten document, already validated
    Modified(String),
}

/// Run `expression` against `content` as the given kind
pub fn apply<E: Evaluator>(
    evaluator: E,
    expression: &str,
    kind: ExpressionKind,
    content: &str,
) -> Result<Outcome> {
    let processor = Processor::new(evaluator);
    let output = processor.run(expression, content, kind.is_mutation())?;

    if !kind.is_mutation() {
        return Ok(Outcome::Printed(output));
    }

    if output == content {
        return Ok(Outcome::Unchanged);
    }

    if let Some(kind) = extract(&output).validation_error {
        return Err(FmqError::invalid_result(expression, kind));
    }

    if has_comments(&extract(content).frontmatter) {
        warn!("Comments in the frontmatter are not kept when it is rewritten by '{expression}'");
    }

    Ok(Outcome::Modified(output))
}

/// What happened to a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditReport {
    pub path: PathBuf,
    pub kind: ExpressionKind,
    pub outcome: Outcome,
    /// Present when a mutation was handed to the writer
    pub write: Option<WriteResult>,
}

/// Validation status of one note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub path: PathBuf,
    pub has_frontmatter: bool,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub kind: Option<ValidationError>,
}

/// Reads, evaluates and persists notes
#[derive(Debug, Clone)]
pub struct NoteOps<E> {
    evaluator: E,
    classifier: Classifier,
    reader: NoteReader,
    writer: NoteWriter,
}

impl<E: Evaluator> NoteOps<E> {
    pub fn new(evaluator: E, reader: NoteReader, writer: NoteWriter) -> Result<Self> {
        Ok(Self {
            evaluator,
            classifier: Classifier::new()?,
            reader,
            writer,
        })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Run `expression` on the note at `path` and persist a mutation
    pub fn edit_note(
        &self,
        path: &Path,
        expression: &str,
        mode: Mode,
        options: &WriteOptions,
    ) -> Result<EditReport> {
        let note = self.reader.read(path)?;
        let kind = self.classifier.resolve(expression, mode);
        debug!("Treating '{}' as a {}", expression, kind);

        let outcome = apply(&self.evaluator, expression, kind, &note.content)?;
        let write = match &outcome {
            Outcome::Modified(updated) => {
                Some(self.writer.write(path, &note.content, updated, options)?)
            }
            Outcome::Unchanged => {
                info!("{} is unchanged", path.display());
                None
            }
            Outcome::Printed(_) => None,
        };

        Ok(EditReport {
            path: path.to_path_buf(),
            kind,
            outcome,
            write,
        })
    }

    /// Check the frontmatter of the note at `path`
    pub fn validate_note(&self, path: &Path) -> Result<ValidationReport> {
        let note = self.reader.read(path)?;
        let extraction = note.extract();
        Ok(ValidationReport {
            path: note.path,
            has_frontmatter: extraction.has_frontmatter,
            valid: extraction.is_valid(),
            error: extraction.validation_error.map(|e| e.to_string()),
            kind: extraction.validation_error,
        })
    }
}

impl NoteOps<YqEvaluator> {
    /// Evaluate a query on the note at `path` and return the result values
    pub fn query_values(&self, path: &Path, expression: &str) -> Result<Vec<Value>> {
        let note = self.reader.read(path)?;
        Processor::new(self.evaluator).query_values(expression, &note.content)
    }
}
