//! CLI end-to-end tests
//!
//! Tests for the mediabrowse command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the mediabrowse binary
#[allow(deprecated)]
fn mediabrowse_cmd() -> Command {
    let mut cmd = Command::cargo_bin("mediabrowse").unwrap();
    cmd.env_remove("MEDIA_ROOT").env_remove("HOST").env_remove("PORT");
    cmd
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = mediabrowse_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = mediabrowse_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mediabrowse"));
}

#[test]
fn test_cli_validate_defaults() {
    let mut cmd = mediabrowse_cmd();
    cmd.arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains("0.0.0.0:8080"));
}

#[test]
fn test_cli_validate_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{"server": {"port": 9000}, "media": {"root": "/srv/videos"}}"#,
    )
    .unwrap();

    let mut cmd = mediabrowse_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("0.0.0.0:9000"))
        .stdout(predicate::str::contains("/srv/videos"));
}

#[test]
fn test_cli_validate_env_override() {
    let mut cmd = mediabrowse_cmd();
    cmd.arg("validate")
        .env("MEDIA_ROOT", "/mnt/nas")
        .env("PORT", "3001")
        .assert()
        .success()
        .stdout(predicate::str::contains("/mnt/nas"))
        .stdout(predicate::str::contains(":3001"));
}

#[test]
fn test_cli_validate_invalid_json_fails() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, "{not json").unwrap();

    let mut cmd = mediabrowse_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config parse error"));
}

#[test]
fn test_cli_start_with_missing_root_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let mut cmd = mediabrowse_cmd();
    cmd.arg("start")
        .arg("--port")
        .arg("0")
        .arg("--root")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
