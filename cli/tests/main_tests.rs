//! # nbstack CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Top-level behavior of the `nbstack` binary: help and version flags, and
//! what happens when the command is missing or unknown.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_help_flag() {
    nbstack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("na-create-superuser"));
}

#[test]
fn test_version_flag() {
    nbstack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_command_lists_commands() {
    nbstack_cmd()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Available commands:"))
        .stdout(predicate::str::contains("restore <date>"));
}

#[cfg(unix)]
#[test]
fn test_unknown_command_runs_nothing() {
    let project = Project::new();
    project.fake_docker(0);

    project
        .cmd()
        .arg("bogus")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown command: bogus"))
        .stdout(predicate::str::contains("Available commands:"));

    assert!(project.docker_calls().is_empty());
}

#[test]
fn test_extra_argument_is_rejected() {
    nbstack_cmd().args(["up", "now"]).assert().code(1);
}
