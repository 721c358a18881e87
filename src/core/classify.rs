//! Deciding whether an expression reads or rewrites frontmatter

use crate::error::Result;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// What an expression does to the frontmatter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionKind {
    /// Reads values; the result is printed
    Query,
    /// Changes the mapping; the result replaces the frontmatter
    Mutation,
}

impl ExpressionKind {
    pub fn is_mutation(self) -> bool {
        self == Self::Mutation
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Mutation => write!(f, "mutation"),
        }
    }
}

/// How the caller wants an expression treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Infer the kind from the expression text
    #[default]
    Auto,
    Query,
    Mutate,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "query" => Ok(Self::Query),
            "mutate" | "mutation" => Ok(Self::Mutate),
            other => Err(format!("unknown mode '{other}' (expected auto, query or mutate)")),
        }
    }
}

/// Recognises mutating expressions by their operators
#[derive(Debug, Clone)]
pub struct Classifier {
    string_literal: Regex,
    assignment: Regex,
    deletion: Regex,
}

impl Classifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            string_literal: Regex::new(r#""(?:[^"\\]|\\.)*""#)?,
            // `=` that is not part of `==`, `!=`, `<=` or `>=`
            assignment: Regex::new(r"(?:^|[^=!<>])=(?:[^=]|$)")?,
            deletion: Regex::new(r"\bdel\s*\(")?,
        })
    }

    /// Classify `expression`, ignoring anything inside string literals
    pub fn classify(&self, expression: &str) -> ExpressionKind {
        let code = self.string_literal.replace_all(expression.trim(), "\"\"");
        if self.assignment.is_match(&code) || self.deletion.is_match(&code) {
            ExpressionKind::Mutation
        } else {
            ExpressionKind::Query
        }
    }

    /// Resolve the kind for `expression` under `mode`
    pub fn resolve(&self, expression: &str, mode: Mode) -> ExpressionKind {
        match mode {
            Mode::Auto => self.classify(expression),
            Mode::Query => ExpressionKind::Query,
            Mode::Mutate => ExpressionKind::Mutation,
        }
    }
}

/// Classify with a freshly built [`Classifier`]
pub fn classify(expression: &str) -> Result<ExpressionKind> {
    Ok(Classifier::new()?.classify(expression))
}
