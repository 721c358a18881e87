//! CLI command handlers that bridge parsed arguments to library operations

use crate::cli_bin::args::*;
use fmq::core::{ExpressionKind, YqEvaluator};
use fmq::error::{FmqError, Result};
use fmq::io::{
    BackupOptions, NoteReader, NoteResolver, NoteWriter, OutputOptions, VaultLocator,
    WriteOptions,
};
use fmq::ops::{NoteOps, Outcome, ValidationReport};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Directory of the vault selected on the command line.
///
/// An explicit path wins; otherwise the vault is looked up by name (or the
/// configured default) in the Obsidian config.
pub fn vault_root(name: Option<&str>, path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => VaultLocator::from_env()?.locate(name),
    }
}

/// Execute the frontmatter command
pub fn frontmatter_command(vault: &Path, args: FrontmatterArgs) -> Result<()> {
    let (expression, note) = args.expression_and_note();
    debug!("Executing frontmatter command: '{}' on '{}'", expression, note);

    let path = NoteResolver::new(vault).resolve(note)?;
    let ops = NoteOps::new(YqEvaluator::new(), NoteReader::new(), NoteWriter::new())?;
    let kind = ops.classifier().resolve(expression, args.mode);

    if kind == ExpressionKind::Query && args.output == OutputFormat::Json {
        return print_json_query(&ops, &path, expression);
    }

    let options = create_write_options(&args.write_options);
    let report = ops.edit_note(&path, expression, args.mode, &options)?;

    match report.outcome {
        Outcome::Printed(text) => print!("{text}"),
        Outcome::Unchanged => info!("No changes to {}", report.path.display()),
        Outcome::Modified(_) => {
            if let Some(write) = report.write {
                if let Some(diff) = write.diff {
                    println!("{diff}");
                }
                if let Some(backup) = write.backup_path {
                    info!("Backup written to {}", backup.display());
                }
            }
        }
    }

    Ok(())
}

/// Evaluate a query and print each result as a line of JSON
fn print_json_query(ops: &NoteOps<YqEvaluator>, path: &Path, expression: &str) -> Result<()> {
    for value in ops.query_values(path, expression)? {
        let json = serde_json::to_string(&value)
            .map_err(|e| FmqError::validation(format!("cannot render result as JSON: {e}")))?;
        println!("{json}");
    }
    Ok(())
}

/// Execute the validate command
pub fn validate_command(vault: &Path, args: ValidateArgs) -> Result<()> {
    debug!("Executing validate command");

    let resolver = NoteResolver::new(vault);
    let paths = if args.all {
        resolver.all_notes()
    } else {
        args.notes
            .iter()
            .map(|note| resolver.resolve(note))
            .collect::<Result<Vec<_>>>()?
    };

    if paths.is_empty() {
        warn!("No notes found to validate");
        return Ok(());
    }

    let ops = NoteOps::new(YqEvaluator::new(), NoteReader::new(), NoteWriter::new())?;
    let mut reports = Vec::with_capacity(paths.len());

    for path in &paths {
        debug!("Validating note: {}", path.display());
        let report = ops.validate_note(path)?;

        let stop = args.fail_fast && !report.valid;
        reports.push(report);
        if stop {
            break;
        }
    }

    output_validation_results(&reports, args.format)?;
    validation_outcome(&reports)
}

/// Fail when any report is invalid; the same error whether or not the run
/// stopped early
fn validation_outcome(reports: &[ValidationReport]) -> Result<()> {
    let failures = reports.iter().filter(|r| !r.valid).count();
    if failures > 0 {
        return Err(FmqError::validation(format!(
            "{} of {} notes failed validation",
            failures,
            reports.len()
        )));
    }

    info!("All {} notes passed validation", reports.len());
    Ok(())
}

fn create_write_options(write_args: &WriteArgs) -> WriteOptions {
    let backup = if write_args.backup_suffix.is_some() || write_args.backup_dir.is_some() {
        Some(BackupOptions {
            enabled: true,
            suffix: write_args.backup_suffix.clone(),
            directory: write_args.backup_dir.clone(),
        })
    } else {
        None
    };

    let output = if write_args.stdout {
        OutputOptions::Stdout
    } else {
        OutputOptions::InPlace
    };

    WriteOptions {
        backup,
        output: Some(output),
        dry_run: write_args.dry_run,
    }
}

fn output_validation_results(reports: &[ValidationReport], format: ValidationFormat) -> Result<()> {
    match format {
        ValidationFormat::Human => {
            for report in reports {
                match &report.error {
                    None => println!("{}: OK", report.path.display()),
                    Some(error) => println!("{}: ERROR - {}", report.path.display(), error),
                }
            }
        }
        ValidationFormat::Json => {
            let output = serde_json::to_string_pretty(reports)
                .map_err(|e| FmqError::validation(e.to_string()))?;
            println!("{output}");
        }
    }
    Ok(())
}
