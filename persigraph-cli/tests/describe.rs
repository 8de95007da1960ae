//! Tests for the describe subcommand of the CLI
//!
//! Miri is globally disabled for these tests because they mostly involve
//! calling the CLI binary, which Miri doesn't support.
#![cfg(all(test, not(miri)))]

use assert_cmd::Command;
use assert_fs::NamedTempFile;
use assert_fs::assert::PathAssert;
use predicates::{prelude::*, str::contains};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn cmd() -> Command {
    Command::cargo_bin("persigraph").unwrap()
}

#[fixture]
fn describe_cmd(mut cmd: Command) -> Command {
    cmd.arg("describe");
    cmd
}

const GRAPH: &str = r#"{
    "nodes": [
        {"type": "Project", "id": "p"},
        {"type": "Task", "id": 1},
        {"type": "Task", "id": 2}
    ],
    "edges": [
        ["Project", "p", "Task", 1, null],
        ["Project", "p", "Task", 2, null],
        ["Task", 2, "Project", "p", null],
        ["Task", 2, "User", 1, null]
    ]
}"#;

#[rstest]
fn test_describe(mut describe_cmd: Command) {
    describe_cmd.write_stdin(GRAPH);
    describe_cmd.assert().success().stdout(
        contains("Graph contains 3 nodes and 2 edges")
            .and(contains("Project: 1"))
            .and(contains("Task: 2"))
            .and(contains("Dropped edges: 2")),
    );
}

#[rstest]
fn test_describe_json(mut describe_cmd: Command) {
    describe_cmd.write_stdin(GRAPH);
    describe_cmd.arg("--json");
    let output = describe_cmd.assert().success().get_output().stdout.clone();
    let desc: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(desc["nodes"], json!(3));
    assert_eq!(desc["edges"], json!(2));
    assert_eq!(
        desc["node_types"],
        json!([{"type": "Project", "count": 1}, {"type": "Task", "count": 2}])
    );
}

#[rstest]
fn test_describe_output_file(mut describe_cmd: Command) {
    let output = NamedTempFile::new("description.txt").unwrap();
    describe_cmd.write_stdin(GRAPH);
    describe_cmd.arg("-o").arg(output.path());
    describe_cmd.assert().success().stdout(predicate::str::is_empty());
    output.assert(contains("Graph contains 3 nodes"));
}

#[rstest]
fn test_describe_empty(mut describe_cmd: Command) {
    describe_cmd.write_stdin("{}");
    describe_cmd
        .assert()
        .success()
        .stdout(contains("Graph contains 0 nodes and 0 edges"));
}
