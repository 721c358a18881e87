//! Integration tests for the fmq library and binary
//!
//! These exercise notes on disk end to end: resolution inside a vault,
//! query and mutation through the default evaluator, and the CLI's output
//! and exit codes.

use fmq::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use fmq::io::CONFIG_HOME_ENV;
use std::process::{Command, Output};
use tempfile::TempDir;

const NOTE: &str = "---\ntitle: Test\nauthor: Jane\ntags:\n- golang\n- testing\n---\n\n# Body content\n";

fn vault_with(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn ops() -> NoteOps<YqEvaluator> {
    NoteOps::new(YqEvaluator::new(), NoteReader::new(), NoteWriter::new()).unwrap()
}

fn fmq(vault: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fmq"))
        .arg("--vault-path")
        .arg(vault)
        .args(args)
        .env_remove("FMQ_VAULT")
        .env_remove("FMQ_VAULT_PATH")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

/// Run the binary with vaults looked up through config files under `config_home`
fn fmq_with_config(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fmq"))
        .args(args)
        .env(CONFIG_HOME_ENV, config_home)
        .env_remove("FMQ_VAULT")
        .env_remove("FMQ_VAULT_PATH")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

/// Register `vault` with Obsidian under `config_home`, optionally as the default
fn register_vault(config_home: &Path, vault: &Path, default: bool) {
    let name = vault.file_name().unwrap().to_str().unwrap();
    fs::create_dir_all(config_home.join("obsidian")).unwrap();
    fs::write(
        config_home.join("obsidian/obsidian.json"),
        serde_json::json!({ "vaults": { "0f1e2d": { "path": vault } } }).to_string(),
    )
    .unwrap();

    if default {
        fs::create_dir_all(config_home.join("obsidian-cli")).unwrap();
        fs::write(
            config_home.join("obsidian-cli/preferences.json"),
            serde_json::json!({ "default_vault_name": name }).to_string(),
        )
        .unwrap();
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_query_then_mutate_workflow() {
    let vault = vault_with(&[("notes/post.md", NOTE)]);
    let path = NoteResolver::new(vault.path()).resolve("post").unwrap();
    let ops = ops();

    let report = ops
        .edit_note(&path, ".tags | length", Mode::Auto, &WriteOptions::default())
        .unwrap();
    assert_eq!(report.outcome, Outcome::Printed("2\n".to_string()));

    let report = ops
        .edit_note(
            &path,
            ".tags += [\"new-tag\"] | .draft = true",
            Mode::Auto,
            &WriteOptions::default(),
        )
        .unwrap();
    assert_eq!(report.kind, ExpressionKind::Mutation);

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "---\ntitle: Test\nauthor: Jane\ntags:\n- golang\n- testing\n- new-tag\ndraft: true\n---\n\n# Body content\n"
    );
}

#[test]
fn test_unchanged_mutation_leaves_file_alone() {
    let vault = vault_with(&[("post.md", NOTE)]);
    let path = vault.path().join("post.md");
    let before = fs::metadata(&path).unwrap().modified().unwrap();

    let report = ops()
        .edit_note(&path, ".title = \"Test\"", Mode::Auto, &WriteOptions::default())
        .unwrap();

    assert_eq!(report.outcome, Outcome::Unchanged);
    assert_eq!(report.write, None);
    assert_eq!(fs::read_to_string(&path).unwrap(), NOTE);
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);
}

#[test]
fn test_invalid_notes_are_never_rewritten() {
    let scalar = "---\njust a string\n---\nBody\n";
    let unclosed = "---\ntitle: Test\nBody\n";
    let vault = vault_with(&[("scalar.md", scalar), ("unclosed.md", unclosed)]);
    let ops = ops();

    let err = ops
        .edit_note(
            &vault.path().join("scalar.md"),
            ".title = \"x\"",
            Mode::Auto,
            &WriteOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, FmqError::ScalarFrontmatter));

    let err = ops
        .edit_note(
            &vault.path().join("unclosed.md"),
            ".",
            Mode::Auto,
            &WriteOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, FmqError::MissingClosingDelimiter));

    assert_eq!(fs::read_to_string(vault.path().join("scalar.md")).unwrap(), scalar);
    assert_eq!(fs::read_to_string(vault.path().join("unclosed.md")).unwrap(), unclosed);
}

#[test]
fn test_body_delimiters_survive_mutation() {
    let doc = "---\ntitle: Test\n---\nIntro\n---\nNot frontmatter\n---\n";
    let vault = vault_with(&[("post.md", doc)]);
    let path = vault.path().join("post.md");

    ops()
        .edit_note(&path, "del(.title)", Mode::Auto, &WriteOptions::default())
        .unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "---\n{}\n---\nIntro\n---\nNot frontmatter\n---\n"
    );
}

#[test]
fn test_cli_query() {
    let vault = vault_with(&[("post.md", NOTE)]);

    let output = fmq(vault.path(), &["frontmatter", ".title", "post"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Test\n");

    let output = fmq(vault.path(), &["fm", "post"]);
    assert!(stdout(&output).contains("author: Jane"));
}

#[test]
fn test_cli_json_output() {
    let vault = vault_with(&[("post.md", NOTE)]);

    let output = fmq(vault.path(), &["fm", ".tags", "post", "--output", "json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "[\"golang\",\"testing\"]\n");
}

#[test]
fn test_cli_mutation_writes_note() {
    let vault = vault_with(&[("post.md", NOTE)]);

    let output = fmq(vault.path(), &["fm", "del(.author)", "post"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "");

    let content = fs::read_to_string(vault.path().join("post.md")).unwrap();
    assert!(!content.contains("author"));
    assert!(content.ends_with("\n# Body content\n"));
}

#[test]
fn test_cli_dry_run_prints_diff() {
    let vault = vault_with(&[("post.md", NOTE)]);

    let output = fmq(vault.path(), &["fm", ".title = \"New\"", "post", "--dry-run"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let diff = stdout(&output);
    assert!(diff.contains("-title: Test"));
    assert!(diff.contains("+title: New"));
    assert_eq!(fs::read_to_string(vault.path().join("post.md")).unwrap(), NOTE);
}

#[test]
fn test_cli_backup() {
    let vault = vault_with(&[("post.md", NOTE)]);

    let output = fmq(
        vault.path(),
        &["fm", ".draft = false", "post", "--backup-suffix", ".orig"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        fs::read_to_string(vault.path().join("post.md.orig")).unwrap(),
        NOTE
    );
}

#[test]
fn test_cli_scalar_frontmatter_hint() {
    let vault = vault_with(&[("bad.md", "---\njust a string\n---\n")]);

    let output = fmq(vault.path(), &["fm", ".title", "bad"]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("The existing frontmatter in 'bad' is invalid."));
    assert!(err.contains("scalar value instead of key-value pairs"));
}

#[test]
fn test_cli_forced_mutation_hint() {
    let vault = vault_with(&[("post.md", NOTE)]);

    let output = fmq(vault.path(), &["fm", ".title", "post", "--mode", "mutate"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Your expression '.title' is a query, not a mutation."));
    assert_eq!(fs::read_to_string(vault.path().join("post.md")).unwrap(), NOTE);
}

#[test]
fn test_cli_evaluation_error_exit_code() {
    let vault = vault_with(&[("post.md", NOTE)]);

    let output = fmq(vault.path(), &["fm", ".title[0]", "post"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("yaml processing error"));
}

#[test]
fn test_cli_missing_note() {
    let vault = vault_with(&[]);

    let output = fmq(vault.path(), &["fm", "nowhere"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Note not found"));
}

#[test]
fn test_cli_validate() {
    let vault = vault_with(&[
        ("good.md", NOTE),
        ("plain.md", "# No frontmatter\n"),
        ("sub/bad.md", "---\ntitle: open\n"),
    ]);

    let output = fmq(vault.path(), &["validate", "good", "plain"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).matches(": OK").count(), 2);

    let output = fmq(vault.path(), &["validate", "--all", "--format", "json"]);
    assert_eq!(output.status.code(), Some(1));
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 3);
    let invalid: Vec<_> = reports
        .iter()
        .filter(|r| r["valid"] == serde_json::Value::Bool(false))
        .collect();
    assert_eq!(invalid.len(), 1);
    assert_eq!(
        invalid[0]["error"],
        "invalid frontmatter: missing closing delimiter"
    );
}

#[test]
fn test_cli_vault_by_name() {
    let root = TempDir::new().unwrap();
    let vault = root.path().join("test-vault");
    fs::create_dir_all(&vault).unwrap();
    fs::write(vault.join("post.md"), NOTE).unwrap();
    let config_home = root.path().join(".config");
    register_vault(&config_home, &vault, false);

    let output = fmq_with_config(&config_home, &["--vault", "test-vault", "fm", ".title", "post"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Test\n");

    let output = fmq_with_config(&config_home, &["--vault", "other", "fm", ".title", "post"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Vault not found: other"));
}

#[test]
fn test_cli_default_vault() {
    let root = TempDir::new().unwrap();
    let vault = root.path().join("test-vault");
    fs::create_dir_all(&vault).unwrap();
    fs::write(vault.join("post.md"), NOTE).unwrap();
    let config_home = root.path().join(".config");

    let output = fmq_with_config(&config_home, &["fm", ".title", "post"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Config error"));

    register_vault(&config_home, &vault, true);
    let output = fmq_with_config(&config_home, &["fm", ".title = \"Set\"", "post"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(fs::read_to_string(vault.join("post.md"))
        .unwrap()
        .contains("title: Set"));
}

#[test]
fn test_cli_validate_fail_fast_exit_code() {
    let vault = vault_with(&[("a.md", "---\nscalar\n---\n"), ("b.md", NOTE)]);

    let fast = fmq(vault.path(), &["validate", "a", "b", "--fail-fast"]);
    let full = fmq(vault.path(), &["validate", "a", "b"]);
    assert_eq!(fast.status.code(), Some(1));
    assert_eq!(full.status.code(), Some(1));
    assert_eq!(stdout(&fast).lines().count(), 1);
    assert_eq!(stdout(&full).lines().count(), 2);
}

#[test]
fn test_cli_mutation_with_comments_warns() {
    let vault = vault_with(&[("post.md", "---\ntitle: Old # keep me\n---\nBody\n")]);

    let output = fmq(vault.path(), &["fm", ".title = \"New\"", "post"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("Comments in the frontmatter are not kept"));
    assert_eq!(
        fs::read_to_string(vault.path().join("post.md")).unwrap(),
        "---\ntitle: New\n---\nBody\n"
    );
}
