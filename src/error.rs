//! Error types for the fmq library
//!
//! Extraction problems are first carried as a [`ValidationError`] inside an
//! [`ExtractionResult`](crate::core::ExtractionResult) and only become an
//! [`FmqError`] when an operation refuses to continue with them.

use crate::core::EvaluationError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a frontmatter block was rejected by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    /// An opening `---` was found but never closed
    MissingClosingDelimiter,
    /// The block holds a bare scalar instead of key-value pairs
    ScalarFrontmatter,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingClosingDelimiter => {
                write!(f, "invalid frontmatter: missing closing delimiter")
            }
            Self::ScalarFrontmatter => write!(
                f,
                "invalid frontmatter: must be a YAML object (key-value pairs), not a scalar value"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum FmqError {
    /// Frontmatter opened but never closed
    #[error("invalid frontmatter: missing closing delimiter")]
    MissingClosingDelimiter,

    /// Frontmatter is a scalar rather than a mapping
    #[error("invalid frontmatter: must be a YAML object (key-value pairs), not a scalar value")]
    ScalarFrontmatter,

    /// The expression could not be parsed or failed against the document
    #[error("yaml processing error: {source}")]
    Evaluation {
        #[source]
        source: EvaluationError,
    },

    /// A mutation produced a document whose frontmatter does not validate
    #[error("expression '{expression}' would create invalid frontmatter: {kind}")]
    InvalidResult {
        expression: String,
        kind: ValidationError,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Regex compilation errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Note could not be located
    #[error("Note not found: {path}")]
    NoteNotFound { path: PathBuf },

    /// No vault with this name is registered with Obsidian
    #[error("Vault not found: {name}")]
    VaultNotFound { name: String },

    /// A configuration file is missing, unreadable or malformed
    #[error("Config error: {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// Permission errors
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// File exceeds the configured read limit
    #[error("File too large: {path} is {size} bytes (limit: {limit} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    /// Backup operation errors
    #[error("Backup error: {reason}")]
    Backup { reason: String },

    /// Invalid user input
    #[error("Validation error: {message}")]
    Validation { message: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FmqError>;

impl FmqError {
    /// Wrap an evaluator failure
    pub fn evaluation(source: EvaluationError) -> Self {
        Self::Evaluation { source }
    }

    /// Create an invalid result error for a mutation
    pub fn invalid_result(expression: impl Into<String>, kind: ValidationError) -> Self {
        Self::InvalidResult {
            expression: expression.into(),
            kind,
        }
    }

    /// Create a new note not found error
    pub fn note_not_found(path: impl Into<PathBuf>) -> Self {
        Self::NoteNotFound { path: path.into() }
    }

    /// Create a new vault not found error
    pub fn vault_not_found(name: impl Into<String>) -> Self {
        Self::VaultNotFound { name: name.into() }
    }

    /// Create a new config error
    pub fn config(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied { path: path.into() }
    }

    /// Create a new backup error
    pub fn backup(reason: impl Into<String>) -> Self {
        Self::Backup {
            reason: reason.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// The extraction failure behind this error, if any
    pub fn validation_kind(&self) -> Option<ValidationError> {
        match self {
            Self::MissingClosingDelimiter => Some(ValidationError::MissingClosingDelimiter),
            Self::ScalarFrontmatter => Some(ValidationError::ScalarFrontmatter),
            Self::InvalidResult { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Process exit code the binary reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingClosingDelimiter | Self::ScalarFrontmatter | Self::InvalidResult { .. } => {
                2
            }
            Self::Evaluation { .. } => 3,
            _ => 1,
        }
    }
}

impl From<ValidationError> for FmqError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingClosingDelimiter => Self::MissingClosingDelimiter,
            ValidationError::ScalarFrontmatter => Self::ScalarFrontmatter,
        }
    }
}

impl From<EvaluationError> for FmqError {
    fn from(source: EvaluationError) -> Self {
        Self::evaluation(source)
    }
}
