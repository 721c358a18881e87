//! Core frontmatter logic: extraction, classification and processing

pub mod classify;
pub mod evaluator;
pub mod extractor;
pub mod processor;

pub use classify::{classify, Classifier, ExpressionKind, Mode};
pub use evaluator::{EvaluationError, Evaluator, YqEvaluator};
pub use extractor::{extract, has_comments, ExtractionResult, DELIMITER, EMPTY_OBJECT};
pub use processor::{evaluate_expression, evaluation_input, reconstruct, Processor};
