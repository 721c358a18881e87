//! The query-or-mutate pipeline between document text and an evaluator

use super::evaluator::{Evaluator, YqEvaluator};
use super::extractor::{extract, DELIMITER, EMPTY_OBJECT};
use crate::error::{FmqError, Result};
use serde_yaml::Value;

/// The text handed to an evaluator for a frontmatter block; empty or
/// whitespace-only blocks become `{}`.
pub fn evaluation_input(yaml: &str) -> &str {
    if yaml.trim().is_empty() {
        EMPTY_OBJECT
    } else {
        yaml
    }
}

/// Evaluate `expression` against frontmatter text.
///
/// Empty or whitespace-only input is evaluated as `{}`.
pub fn evaluate_expression<E: Evaluator + ?Sized>(
    evaluator: &E,
    yaml: &str,
    expression: &str,
) -> Result<String> {
    evaluator
        .evaluate(expression, evaluation_input(yaml))
        .map_err(FmqError::evaluation)
}

/// Reassemble a document from processed frontmatter and an untouched body.
///
/// The frontmatter is trimmed and framed by delimiters; the body is
/// appended verbatim.
pub fn reconstruct(processed: &str, body: &str) -> String {
    let trimmed = processed.trim();
    let mut output =
        String::with_capacity(trimmed.len() + body.len() + 2 * (DELIMITER.len() + 1) + 1);
    output.push_str(DELIMITER);
    output.push('\n');
    output.push_str(trimmed);
    output.push('\n');
    output.push_str(DELIMITER);
    output.push('\n');
    output.push_str(body);
    output
}

/// Runs expressions against documents with a fixed evaluator
#[derive(Debug, Clone, Default)]
pub struct Processor<E> {
    evaluator: E,
}

impl<E: Evaluator> Processor<E> {
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Extract the frontmatter of `document` and evaluate `expression` on it.
    ///
    /// Invalid frontmatter is rejected before the evaluator is called.
    pub fn process_frontmatter(&self, expression: &str, document: &str) -> Result<String> {
        let extraction = extract(document).into_valid()?;
        evaluate_expression(&self.evaluator, &extraction.frontmatter, expression)
    }

    /// Process `document`; with `full_file` the result is spliced back into
    /// a complete document around the original body.
    pub fn run(&self, expression: &str, document: &str, full_file: bool) -> Result<String> {
        let processed = self.process_frontmatter(expression, document)?;
        if !full_file {
            return Ok(processed);
        }

        let body = extract(document).body;
        Ok(reconstruct(&processed, &body))
    }
}

impl Processor<YqEvaluator> {
    /// Like [`Processor::process_frontmatter`], but returns the result values
    /// instead of serialised text
    pub fn query_values(&self, expression: &str, document: &str) -> Result<Vec<Value>> {
        let extraction = extract(document).into_valid()?;
        self.evaluator
            .evaluate_values(expression, evaluation_input(&extraction.frontmatter))
            .map_err(FmqError::evaluation)
    }
}
