//! CLI integration tests for the figground-eval binary.
//!
//! Tests run the binary through `std::process::Command` against the fixture
//! dataset, covering exit codes, written files and stdout/stderr output.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// =============================================================================
// Helper Functions
// =============================================================================

fn eval_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_figground-eval"))
}

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Run inside `cwd` so no workspace configuration file is picked up
fn run_in(cwd: &Path, args: &[&str]) -> Output {
    Command::new(eval_bin())
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("Failed to execute figground-eval binary")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Expected exit code 0, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn assert_failure(output: &Output) {
    assert_eq!(
        output.status.code(),
        Some(1),
        "Expected exit code 1, got {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

/// Copy one fixture item into a fresh items directory
fn single_item_dataset(root: &Path, id: &str) -> PathBuf {
    let items = root.join("items");
    let dst = items.join(id);
    std::fs::create_dir_all(&dst).unwrap();
    for entry in std::fs::read_dir(fixtures().join("items").join(id)).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), dst.join(entry.file_name())).unwrap();
    }
    items
}

// =============================================================================
// run
// =============================================================================

#[test]
fn test_run_writes_report_to_out() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report").join("results.csv");
    let items = fixtures().join("items");
    let responses = fixtures().join("responses");

    let output = run_in(
        dir.path(),
        &[
            "run",
            "--items-dir",
            path_str(&items),
            "--responses-dir",
            path_str(&responses),
            "--out",
            path_str(&out),
        ],
    );
    assert_success(&output);

    let csv = std::fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("item,variant,role,status,correct,answer,precision,recall,f1,flags,consistency\n"));
    assert_eq!(csv.lines().count(), 6);
    assert!(csv.contains("T1_mark_removed,decisive,graded"));
    assert!(!csv.contains("T2_full_txtimg"));

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.with_file_name("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["summary"]["skipped"][0]["item"], "T2");
    assert_eq!(summary["summary"]["graded_rows"], 4);

    let stdout = stdout_str(&output);
    assert!(stdout.contains("Accuracy: 0.750 (3/4)"), "{}", stdout);
    assert!(stdout.contains("T2:"), "{}", stdout);
}

#[test]
fn test_run_into_output_dir_uses_run_id() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("runs");
    let output = run_in(
        dir.path(),
        &[
            "run",
            "--items-dir",
            path_str(&fixtures().join("items")),
            "--responses-dir",
            path_str(&fixtures().join("responses")),
            "--output-dir",
            path_str(&output_dir),
            "--parallel",
            "1",
        ],
    );
    assert_success(&output);

    let runs: Vec<_> = std::fs::read_dir(&output_dir).unwrap().collect();
    assert_eq!(runs.len(), 1);
    let run_dir = runs.into_iter().next().unwrap().unwrap().path();
    assert!(run_dir.join("results.csv").is_file());
    assert!(run_dir.join("summary.json").is_file());
}

#[test]
fn test_run_missing_items_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results.csv");
    let output = run_in(
        dir.path(),
        &[
            "run",
            "--items-dir",
            path_str(&dir.path().join("nope")),
            "--responses-dir",
            path_str(dir.path()),
            "--out",
            path_str(&out),
        ],
    );
    assert_failure(&output);
    assert!(stderr_str(&output).contains("Items directory not found"));
    assert!(!out.exists());
}

#[test]
fn test_run_empty_items_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("items")).unwrap();
    let output = run_in(
        dir.path(),
        &["run", "--items-dir", "items", "--responses-dir", "responses"],
    );
    assert_failure(&output);
    assert!(stderr_str(&output).contains("No items found"));
    assert!(!dir.path().join("results").exists());
}

#[test]
fn test_run_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("eval.toml");
    std::fs::write(&config, "[output]\noutput_dir = \"custom\"\nreport_file = \"rows.csv\"\nwrite_json_summary = false\n").unwrap();

    let output = run_in(
        dir.path(),
        &[
            "--config",
            path_str(&config),
            "run",
            "--items-dir",
            path_str(&fixtures().join("items")),
            "--responses-dir",
            path_str(&fixtures().join("responses")),
        ],
    );
    assert_success(&output);

    let run_dir = std::fs::read_dir(dir.path().join("custom"))
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    assert!(run_dir.join("rows.csv").is_file());
    assert!(!run_dir.join("summary.json").exists());
}

// =============================================================================
// validate
// =============================================================================

#[test]
fn test_validate_reports_broken_item() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["validate", "--items-dir", path_str(&fixtures().join("items"))]);
    assert_failure(&output);

    let stdout = stdout_str(&output);
    assert!(stdout.contains("OK   T1"), "{}", stdout);
    assert!(stdout.contains("FAIL T2"), "{}", stdout);
    assert!(stdout.contains("symbol par1 has no sym2geo relation"), "{}", stdout);
}

#[test]
fn test_validate_clean_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let items = single_item_dataset(dir.path(), "T1");
    let output = run_in(dir.path(), &["validate", "--items-dir", path_str(&items)]);
    assert_success(&output);
    assert!(stdout_str(&output).contains("1 items, 0 failed"));
}

// =============================================================================
// list-items / init-config
// =============================================================================

#[test]
fn test_list_items() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["list-items", "--items-dir", path_str(&fixtures().join("items"))]);
    assert_success(&output);

    let stdout = stdout_str(&output);
    assert!(stdout.contains("Available Items (2)"));
    assert!(stdout.contains("T1 | gold 59"));
    assert!(stdout.contains("T1_mark_removed | decisive"));
    assert!(stdout.contains("T1_txt_only | text_only"));
}

#[test]
fn test_init_config_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["init-config", "--output", "conf/figground.toml"]);
    assert_success(&output);

    let written = std::fs::read_to_string(dir.path().join("conf").join("figground.toml")).unwrap();
    assert!(written.contains("answer_epsilon = 0.01"));
    assert!(written.contains("output_dir = \"results/runs\""));
}

#[test]
fn test_no_subcommand_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(stderr_str(&output).contains("Usage"));
}
