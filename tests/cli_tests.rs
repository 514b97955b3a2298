#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn run_cli(document: &Path, script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.arg(document).write_stdin(script.to_string()).assert()
}

#[test]
fn cli_adds_nested_tasks_and_lists_them() {
    let dir = tempdir().unwrap();
    let doc = dir.path().join("plan.json");
    run_cli(
        &doc,
        "add-task A 2025-01-01 2025-01-31 WH1 Doe\nadd-task B 2025-02-01 2025-02-15 WH1 Doe 1\ntasks\nquit\n",
    )
    .success()
    .stdout(str_contains("Added task 2."))
    .stdout(str_contains("1.1"));
    assert!(doc.exists(), "quitting should save the document");
}

#[test]
fn cli_reports_invalid_category() {
    let dir = tempdir().unwrap();
    run_cli(
        &dir.path().join("plan.json"),
        "add-resource X Invalid WH1\nquit\n",
    )
    .success()
    .stdout(str_contains("invalid resource category 'Invalid'"));
}

#[test]
fn cli_availability_flips_after_assignment() {
    let dir = tempdir().unwrap();
    let script = "add-task X 2025-03-01 2025-03-10 WH1 Doe\n\
                  add-resource R1 Tastatore WH2 diameter=12.5\n\
                  avail 1 2025-03-01 2025-03-10\n\
                  assign 1 1\n\
                  avail 1 2025-03-01 2025-03-10\n\
                  quit\n";
    run_cli(&dir.path().join("plan.json"), script)
        .success()
        .stdout(str_contains("Resource 1 is available."))
        .stdout(str_contains("Resource 1 is busy."));
}

#[test]
fn cli_state_persists_between_runs() {
    let dir = tempdir().unwrap();
    let doc = dir.path().join("plan.json");
    run_cli(&doc, "add-resource Persisted Testa WH1\nquit\n").success();

    let assert = run_cli(&doc, "query category=Testa\nquit\n").success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(
        output.contains("Persisted"),
        "expected saved resource to be listed:\n{}",
        output
    );
}

#[test]
fn cli_query_requires_both_window_bounds() {
    let dir = tempdir().unwrap();
    run_cli(&dir.path().join("plan.json"), "query start=2025-01-01\nquit\n")
        .success()
        .stdout(str_contains("'start' was given without 'end'"));
}

#[test]
fn cli_exports_tasks_to_csv() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("tasks.csv");
    let script = format!(
        "add-task A 2025-01-01 2025-01-31 WH1 Doe\nexport tasks {}\nquit\n",
        csv_path.display()
    );
    run_cli(&dir.path().join("plan.json"), &script)
        .success()
        .stdout(str_contains("Tasks exported to"));
    let contents = std::fs::read_to_string(&csv_path).unwrap();
    assert!(contents.contains("outline_number"));
    assert!(contents.contains("WH1"));
}
