use assert_cmd::Command;

/// The `bf` binary with the developer's limits and config file kept out of the picture.
pub fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("BF_CONFIG", std::env::temp_dir().join("bf-vm-tests-no-config.toml"))
        .env_remove("BF_MAX_STEPS")
        .env_remove("BF_TIMEOUT_MS");
    cmd
}
