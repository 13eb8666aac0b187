mod common;

use common::cargo_bin;
use predicates::prelude::*;
use std::time::Duration;

fn infinite_bf() -> &'static str {
    "+[]" // increments to 1, then [] does nothing forever (infinite loop)
}

#[test]
fn test_timeout_flag_aborts_infinite_loop() {
    cargo_bin()
        .args(["run", "--timeout", "100", infinite_bf()])
        .timeout(Duration::from_secs(5))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Execution aborted").and(predicate::str::contains("timeout")))
        .stdout(predicate::str::contains("Execution aborted").not());
}

#[test]
fn test_timeout_env_fallback() {
    cargo_bin()
        .args(["run", infinite_bf()])
        .env("BF_TIMEOUT_MS", "100")
        .timeout(Duration::from_secs(5))
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout"));
}

#[test]
fn test_step_limit_flag() {
    cargo_bin()
        .args(["run", "--max-steps", "50", infinite_bf()])
        .timeout(Duration::from_secs(5))
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (50)"))
        .stdout(predicate::str::contains("Execution aborted").not());
}

#[test]
fn test_step_limit_env_fallback() {
    cargo_bin()
        .args(["run", infinite_bf()])
        .env("BF_MAX_STEPS", "50")
        .timeout(Duration::from_secs(5))
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (50)"));
}

#[test]
fn test_config_file_limits() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bf.toml");
    std::fs::write(&path, "[limits]\nmax_steps = 25\n").unwrap();
    cargo_bin()
        .env("BF_CONFIG", &path)
        .args(["run", infinite_bf()])
        .timeout(Duration::from_secs(5))
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (25)"));
}
