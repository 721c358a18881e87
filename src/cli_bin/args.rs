//! Command-line argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use fmq::core::Mode;
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser, Debug)]
#[command(
    name = "fmq",
    version,
    about = "Query or modify YAML frontmatter in markdown notes",
    long_about = "fmq reads and rewrites the YAML frontmatter of markdown notes using \
                  jq-style expressions. Queries like '.title' print values; mutations like \
                  '.title = \"value\"' rewrite the note in place."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Name of the Obsidian vault (defaults to the CLI's default vault)
    #[arg(long, global = true, env = "FMQ_VAULT", value_name = "NAME")]
    pub vault: Option<String>,

    /// Use this directory as the vault instead of looking one up by name
    #[arg(
        long,
        global = true,
        env = "FMQ_VAULT_PATH",
        value_name = "DIR",
        conflicts_with = "vault"
    )]
    pub vault_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query or modify note frontmatter
    #[command(visible_alias = "fm")]
    Frontmatter(FrontmatterArgs),
    /// Check that notes have well-formed frontmatter
    Validate(ValidateArgs),
}

/// Arguments for the frontmatter command
#[derive(Args, Debug)]
pub struct FrontmatterArgs {
    /// Expression to evaluate, followed by the note name. With a single
    /// argument the expression defaults to '.'
    #[arg(required = true, num_args = 1..=2, value_names = ["EXPRESSION", "NOTE"])]
    pub args: Vec<String>,

    /// Treat the expression as a query or mutation instead of inferring it
    #[arg(long, default_value = "auto", value_name = "MODE")]
    pub mode: Mode,

    /// Output format for query results
    #[arg(long, value_enum, default_value = "yaml")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub write_options: WriteArgs,
}

impl FrontmatterArgs {
    /// Split the positional arguments into expression and note name
    pub fn expression_and_note(&self) -> (&str, &str) {
        match self.args.as_slice() {
            [note] => (".", note.as_str()),
            [expression, note, ..] => (expression.as_str(), note.as_str()),
            [] => (".", ""),
        }
    }
}

/// Options for writing modified notes
#[derive(Args, Debug, Clone)]
pub struct WriteArgs {
    /// Preview changes without modifying files (show diff)
    #[arg(long)]
    pub dry_run: bool,

    /// Print the modified note instead of writing it
    #[arg(long, conflicts_with = "dry_run")]
    pub stdout: bool,

    /// Create backup files with this suffix
    #[arg(long, value_name = "SUFFIX")]
    pub backup_suffix: Option<String>,

    /// Create backup files in this directory
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Notes to check
    #[arg(required_unless_present = "all")]
    pub notes: Vec<String>,

    /// Check every markdown note in the vault
    #[arg(long, conflicts_with = "notes")]
    pub all: bool,

    /// Stop at the first invalid note
    #[arg(long)]
    pub fail_fast: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "human")]
    pub format: ValidationFormat,
}

/// Output formats for query results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Report formats for validation
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFormat {
    /// One status line per note
    Human,
    /// JSON array of reports
    Json,
}
