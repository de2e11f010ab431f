//! Tests for the `nasin-check` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn nasin_check() -> Command {
    let mut cmd = Command::cargo_bin("nasin-check").unwrap();
    cmd.env_remove("NASIN_GRAMMAR").env_remove("NASIN_LOG");
    cmd
}

#[test]
fn test_default_checks_nasin() {
    nasin_check()
        .assert()
        .success()
        .stdout(predicate::str::contains("CanLoadGrammar(nasin): pass"));
}

#[test]
fn test_all_checks_every_builtin() {
    nasin_check()
        .arg("--all")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 passed, 0 failed"));
}

#[test]
fn test_repeat_reports_summary() {
    nasin_check()
        .args(["--repeat", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100 passed, 0 failed"));
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("grammar.json");

    nasin_check()
        .arg(&missing)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "CanLoadGrammar(grammar): fail: grammar failed to load",
        ));
}

#[test]
fn test_failures_in_a_batch_go_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("extra.json");

    nasin_check()
        .arg("--all")
        .arg(&missing)
        .assert()
        .failure()
        .stdout(predicate::str::contains("2 passed, 1 failed"))
        .stdout(predicate::str::contains("fail:").not())
        .stderr(predicate::str::contains("CanLoadGrammar(extra): fail"));
}

#[test]
fn test_corrupt_file_fails() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{"name": "nasin", "rules": {"root": {"type": "SYMBOL", "name": "nowhere"}}}"#)
        .unwrap();

    nasin_check()
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("CanLoadGrammar(nasin): fail"));
}

#[test]
fn test_env_grammar_is_checked() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"not a grammar").unwrap();

    nasin_check()
        .env("NASIN_GRAMMAR", file.path())
        .assert()
        .failure();
}
