mod common;

use common::cargo_bin;
use predicates::prelude::*;
use std::time::Duration;

#[test]
fn test_invalid_character_error() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).arg("run").arg("+a+")
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid character 'a'"))
    .stdout(predicate::str::is_empty());
}

#[test]
fn test_unmatched_open_bracket_error() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).arg("run").arg("+[")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unmatched bracket '['").and(predicate::str::contains("at instruction 1")));
}

#[test]
fn test_unmatched_close_bracket_error() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).arg("run").arg("]")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unmatched bracket ']'").and(predicate::str::contains("  ^")));
}

#[test]
fn test_input_exhausted_reports_partial_output() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).args(["run", "++++++++[>++++++++<-]>+.,"])
    .assert()
    .failure()
    .stdout(predicate::str::contains("partial brainfuck result: A"))
    .stderr(predicate::str::contains("input exhausted after 1 output byte(s)"));
}

#[test]
fn test_invalid_multibyte_character_is_reported_whole() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).arg("run").arg("+é+")
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid character 'é'").and(predicate::str::contains("\\u{c3}").not()));
}

#[test]
fn test_pointer_underflow_error() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).arg("run").arg("<")
    .assert()
    .failure()
    .stderr(predicate::str::contains("left of cell 0"));
}

#[test]
fn test_bad_input_escape_is_usage_error() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).args(["run", "--input", "\\q", ","])
    .assert()
    .code(2)
    .stderr(predicate::str::contains("bad --input"));
}
