use anyhow::Result;
use clap::Parser;
use fmq::error::{FmqError, ValidationError};
use log::{debug, LevelFilter};

mod cli_bin;

use cli_bin::args::{Cli, Commands};
use cli_bin::commands;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        debug!("{err:?}");
        eprintln!("Error: {err}");
        let code = err.downcast_ref::<FmqError>().map_or(1, FmqError::exit_code);
        std::process::exit(code);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let vault = commands::vault_root(cli.vault.as_deref(), cli.vault_path.as_deref())?;
    debug!("Using vault at {}", vault.display());

    match cli.command {
        Commands::Frontmatter(args) => {
            let (expression, note) = args.expression_and_note();
            let (expression, note) = (expression.to_string(), note.to_string());
            commands::frontmatter_command(&vault, args)
                .map_err(|err| with_hint(err, &note, &expression))
        }
        Commands::Validate(args) => Ok(commands::validate_command(&vault, args)?),
    }
}

/// Attach the remediation advice for frontmatter problems
fn with_hint(err: FmqError, note: &str, expression: &str) -> anyhow::Error {
    let hint = match &err {
        FmqError::ScalarFrontmatter => Some(format!(
            "The existing frontmatter in '{note}' is invalid.\n\
             It contains a scalar value instead of key-value pairs.\n\
             Fix the file's frontmatter, for example by replacing it with '{{}}'."
        )),
        FmqError::MissingClosingDelimiter => Some(format!(
            "The existing frontmatter in '{note}' is invalid.\n\
             It's missing the closing '---' delimiter."
        )),
        FmqError::InvalidResult {
            kind: ValidationError::ScalarFrontmatter,
            ..
        } => Some(format!(
            "Expression would create invalid frontmatter (scalar value instead of key-value pairs).\n\
             Your expression '{expression}' is a query, not a mutation.\n\
             Did you mean to set a value? Example: .title = \"value\""
        )),
        FmqError::InvalidResult { kind, .. } => {
            Some(format!("Expression would create invalid frontmatter: {kind}"))
        }
        _ => None,
    };

    match hint {
        Some(hint) => anyhow::Error::new(err).context(hint),
        None => err.into(),
    }
}
