use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn prints_help() {
    let mut cmd = Command::cargo_bin("icmig").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Cross-org asset migration"));
}

#[test]
fn migrate_help_lists_flags() {
    let mut cmd = Command::cargo_bin("icmig").unwrap();
    cmd.args(["migrate", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--source-region"))
        .stdout(predicate::str::contains("--include-dependencies"))
        .stdout(predicate::str::contains("--poll-interval-secs"));
}
