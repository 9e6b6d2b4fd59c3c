//! Integration tests for the espalier CLI
//!
//! These tests exercise the full CLI workflow against temporary YAML
//! documents. They verify that commands work end-to-end without mocking.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Helper to run espalier against a document
fn run_espalier(args: &[&str], dir: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_espalier"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute espalier")
}

/// Helper to get stdout as string
fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Helper to get stderr as string
fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Write a document into the temp dir and return its path
fn write_tree(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write tree file");
    path
}

const VALID_TREE: &str = r#"
name: "Storage layer"
description: "Where the data lives"
decisions:
  - id: "pick-store"
    title: "Pick a data store"
    description: "Entry point"
    status: "accepted"
  - id: "postgres"
    title: "Use Postgres"
    description: "Chosen branch"
    dependencies: ["pick-store"]
    selectedPath: true
  - id: "mongo"
    title: "Use Mongo"
    description: "Considered and not chosen"
    dependencies: ["pick-store"]
"#;

const BROKEN_TREE: &str = r#"
name: "Broken"
decisions:
  - id: "x"
    title: "X"
    description: "Dangling dependency"
    dependencies: ["missing"]
    status: "tentative"
"#;

const UNPARSABLE: &str = r#"
name: "Unparsable"
decisions:
  - id: "x"
    title: "Unterminated
"#;

// =============================================================================
// Basic Command Tests
// =============================================================================

#[test]
fn test_help_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_espalier"))
        .arg("--help")
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("espalier"));
    assert!(out.contains("decision tree"));
}

#[test]
fn test_version_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_espalier"))
        .arg("--version")
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    assert!(stdout(&output).contains("espalier"));
}

// =============================================================================
// Shell Completion Tests
// =============================================================================

#[test]
fn test_completion_zsh() {
    let output = Command::new(env!("CARGO_BIN_EXE_espalier"))
        .args(["completion", "zsh"])
        .output()
        .expect("Failed to execute");

    assert!(
        output.status.success(),
        "completion zsh failed: {}",
        stderr(&output)
    );
    assert!(
        stdout(&output).contains("#compdef espalier"),
        "zsh completion should contain #compdef"
    );
}

#[test]
fn test_completion_bash() {
    let output = Command::new(env!("CARGO_BIN_EXE_espalier"))
        .args(["completion", "bash"])
        .output()
        .expect("Failed to execute");

    assert!(
        output.status.success(),
        "completion bash failed: {}",
        stderr(&output)
    );
    assert!(
        stdout(&output).contains("_espalier"),
        "bash completion should contain _espalier function"
    );
}

// =============================================================================
// Validate Tests
// =============================================================================

#[test]
fn test_validate_clean_tree() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_tree(&dir, "tree.yaml", VALID_TREE);

    let output = run_espalier(&["validate", "tree.yaml"], dir.path());
    assert!(
        output.status.success(),
        "validate failed: {}",
        stderr(&output)
    );
    let out = stdout(&output);
    assert!(out.contains("Storage layer"));
    assert!(out.contains("3 decisions"));
}

#[test]
fn test_validate_broken_tree_exits_nonzero() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_tree(&dir, "tree.yaml", BROKEN_TREE);

    let output = run_espalier(&["validate", "tree.yaml"], dir.path());
    assert_eq!(output.status.code(), Some(1));

    let err = stderr(&output);
    assert!(err.contains("references unknown dependency: missing"));
    assert!(err.contains("has invalid status: tentative"));
    assert!(err.contains("2 validation error(s) found"));
}

#[test]
fn test_validate_json_output() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_tree(&dir, "tree.yaml", BROKEN_TREE);

    let output = run_espalier(&["validate", "tree.yaml", "--json"], dir.path());
    assert_eq!(output.status.code(), Some(1));

    let errors: Vec<String> =
        serde_json::from_str(&stdout(&output)).expect("Output should be a JSON array");
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("references unknown dependency: missing"));
}

#[test]
fn test_validate_unparsable_tree() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_tree(&dir, "tree.yaml", UNPARSABLE);

    let output = run_espalier(&["validate", "tree.yaml"], dir.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to parse YAML"));
}

#[test]
fn test_validate_missing_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let output = run_espalier(&["validate", "nope.yaml"], dir.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to read"));
}

// =============================================================================
// Export Tests
// =============================================================================

#[test]
fn test_dot_export() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_tree(&dir, "tree.yaml", VALID_TREE);

    let output = run_espalier(&["dot", "tree.yaml"], dir.path());
    assert!(output.status.success(), "dot failed: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("digraph DecisionTree"));
    assert!(out.contains("\"pick-store\" -> \"postgres\""));
    assert!(out.contains("rankdir=TB"));
}

#[test]
fn test_dot_export_rankdir_override() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_tree(&dir, "tree.yaml", VALID_TREE);

    let output = run_espalier(&["dot", "tree.yaml", "--rankdir", "LR"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("rankdir=LR"));
}

#[test]
fn test_json_export() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_tree(&dir, "tree.yaml", VALID_TREE);

    let output = run_espalier(&["json", "tree.yaml"], dir.path());
    assert!(output.status.success(), "json failed: {}", stderr(&output));

    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("Output should be valid JSON");
    assert_eq!(json["name"], "Storage layer");
    assert_eq!(json["rootDecisions"][0], "pick-store");
    // Propagation ran: the undecided sibling was rejected
    assert_eq!(json["decisions"]["mongo"]["selectedPath"], false);
}

#[test]
fn test_export_warns_but_proceeds_on_validation_errors() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_tree(&dir, "tree.yaml", BROKEN_TREE);

    let output = run_espalier(&["dot", "tree.yaml"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("digraph DecisionTree"));
    assert!(stderr(&output).contains("references unknown dependency: missing"));
}

// =============================================================================
// Show Tests
// =============================================================================

#[test]
fn test_show_tree_summary() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_tree(&dir, "tree.yaml", VALID_TREE);

    let output = run_espalier(&["show", "tree.yaml"], dir.path());
    assert!(output.status.success(), "show failed: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Storage layer"));
    assert!(out.contains("Where the data lives"));
    assert!(out.contains("pick-store"));
    assert!(out.contains("postgres"));
    assert!(out.contains("mongo"));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_default_tree_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_tree(&dir, "architecture.yaml", VALID_TREE);

    let config_dir = dir.path().join(".espalier");
    std::fs::create_dir(&config_dir).expect("Failed to create config dir");
    std::fs::write(
        config_dir.join("config.toml"),
        "[tree]\nfile = \"architecture.yaml\"\n",
    )
    .expect("Failed to write config");

    // No file argument: the configured default is picked up
    let output = run_espalier(&["validate"], dir.path());
    assert!(
        output.status.success(),
        "validate with config failed: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("Storage layer"));
}
