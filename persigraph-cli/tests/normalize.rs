//! Tests for the normalize subcommand of the CLI
//!
//! Miri is globally disabled for these tests because they mostly involve
//! calling the CLI binary, which Miri doesn't support.
#![cfg(all(test, not(miri)))]

use assert_cmd::Command;
use assert_fs::{NamedTempFile, fixture::FileWriteStr};
use predicates::str::contains;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn cmd() -> Command {
    Command::cargo_bin("persigraph").unwrap()
}

#[fixture]
fn normalize_cmd(mut cmd: Command) -> Command {
    cmd.arg("normalize");
    cmd
}

const GRAPH: &str = r#"{
    "nodes": [
        {"type": "Task", "id": 1, "title": "old"},
        {"type": "Tag", "id": "x"},
        {"type": "Task", "id": 1, "title": "new"}
    ],
    "edges": [
        ["Task", 1, "Tag", "x", null],
        ["Tag", "x", "Task", 1, {"w": 2}],
        ["Tag", "x", "Tag", "y", null]
    ]
}"#;

fn normalized(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[rstest]
fn test_normalize(mut normalize_cmd: Command) {
    normalize_cmd.write_stdin(GRAPH);
    assert_eq!(
        normalized(&mut normalize_cmd),
        json!({
            "nodes": [
                {"type": "Task", "id": 1, "title": "new"},
                {"type": "Tag", "id": "x"}
            ],
            "edges": [["Task", 1, "Tag", "x", {"w": 2}]]
        })
    );
}

#[rstest]
fn test_normalize_is_idempotent(mut cmd: Command, mut normalize_cmd: Command) {
    normalize_cmd.write_stdin(GRAPH);
    let once = normalized(&mut normalize_cmd);

    let file = NamedTempFile::new("normalized.json").unwrap();
    file.write_str(&once.to_string()).unwrap();
    cmd.arg("normalize").arg(file.path());
    assert_eq!(normalized(&mut cmd), once);
}

#[rstest]
fn test_normalize_strict(mut normalize_cmd: Command) {
    normalize_cmd.write_stdin(GRAPH);
    normalize_cmd.arg("--strict");
    normalize_cmd
        .assert()
        .failure()
        .stderr(contains("node Task(1) is listed more than once"));
}
