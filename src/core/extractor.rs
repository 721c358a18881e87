//! Frontmatter extraction and validation
//!
//! The extractor splits a markdown document into its frontmatter block and
//! body. Only the first two `---` lines delimit the block; any later ones
//! are ordinary body content.

use crate::error::ValidationError;

/// Delimiter line that opens and closes a frontmatter block
pub const DELIMITER: &str = "---";

/// The empty mapping literal accepted as valid frontmatter
pub const EMPTY_OBJECT: &str = "{}";

/// Outcome of scanning a document for frontmatter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionResult {
    /// Lines strictly between the first two delimiters, newline-terminated
    pub frontmatter: String,
    /// Every other line, newline-terminated
    pub body: String,
    /// Whether at least two delimiters were seen
    pub has_frontmatter: bool,
    /// The validation failure, if any
    pub validation_error: Option<ValidationError>,
}

impl ExtractionResult {
    /// Whether the frontmatter is absent or a closed mapping
    pub fn is_valid(&self) -> bool {
        self.validation_error.is_none()
    }

    /// Convert into a `Result`, failing with the validation error
    pub fn into_valid(self) -> Result<Self, ValidationError> {
        match self.validation_error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    Inside,
}

/// Split `content` into frontmatter and body, then validate the block.
///
/// Never fails: problems are reported through
/// [`ExtractionResult::validation_error`].
pub fn extract(content: &str) -> ExtractionResult {
    let mut frontmatter = String::new();
    let mut body = String::new();
    let mut state = ScanState::Outside;
    let mut delimiters = 0usize;

    for line in content.lines() {
        let is_delimiter = line.trim() == DELIMITER;

        state = match (state, is_delimiter) {
            (ScanState::Outside, true) if delimiters == 0 => {
                delimiters += 1;
                ScanState::Inside
            }
            (ScanState::Inside, true) => {
                delimiters += 1;
                ScanState::Outside
            }
            (ScanState::Inside, false) => {
                push_line(&mut frontmatter, line);
                ScanState::Inside
            }
            (ScanState::Outside, _) => {
                if is_delimiter {
                    delimiters += 1;
                }
                push_line(&mut body, line);
                ScanState::Outside
            }
        };
    }

    let validation_error = validate(&frontmatter, delimiters);

    ExtractionResult {
        frontmatter,
        body,
        has_frontmatter: delimiters >= 2,
        validation_error,
    }
}

fn push_line(buf: &mut String, line: &str) {
    buf.push_str(line);
    buf.push('\n');
}

fn validate(frontmatter: &str, delimiters: usize) -> Option<ValidationError> {
    match delimiters {
        0 => None,
        1 => Some(ValidationError::MissingClosingDelimiter),
        _ => {
            let trimmed = frontmatter.trim();
            let looks_scalar =
                !trimmed.is_empty() && trimmed != EMPTY_OBJECT && !trimmed.contains(':');
            looks_scalar.then_some(ValidationError::ScalarFrontmatter)
        }
    }
}

/// Whether `yaml` carries `#` comments.
///
/// Evaluation goes through parsed values, so comments in a mutated block
/// are dropped. Quoted scalars are skipped; block scalars are not
/// recognised and may report false positives.
pub fn has_comments(yaml: &str) -> bool {
    yaml.lines().any(line_has_comment)
}

fn line_has_comment(line: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut prev = ' ';

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '#' && prev.is_whitespace() => return true,
            None if matches!(c, '"' | '\'') && opens_quote(prev) => quote = Some(c),
            None => {}
        }
        prev = c;
    }
    false
}

fn opens_quote(prev: char) -> bool {
    prev.is_whitespace() || matches!(prev, '[' | '{' | ',' | ':')
}
