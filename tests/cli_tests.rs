//! Integration tests for the event-registry CLI
//!
//! These tests run the actual binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ENV_KEYS: [&str; 10] = [
    "PORT",
    "HOST",
    "EMAIL_USER",
    "EMAIL_PASS",
    "NOTIFY_TO",
    "SMTP_HOST",
    "GEMINI_API_KEY",
    "GEMINI_MODEL",
    "PUBLIC_DIR",
    "VIEWS_DIR",
];

/// Binary with a clean environment, run from an empty directory (no .env)
fn registry_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("event-registry").unwrap();
    cmd.current_dir(dir.path());
    for key in ENV_KEYS {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    registry_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Event registration backend"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_config_defaults() {
    let dir = TempDir::new().unwrap();
    registry_cmd(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.0.0.0:3000"))
        .stdout(predicate::str::contains("disabled"));
}

#[test]
fn test_config_masks_secrets() {
    let dir = TempDir::new().unwrap();
    registry_cmd(&dir)
        .arg("config")
        .env("GEMINI_API_KEY", "AIzaSyVerySecretKey")
        .env("EMAIL_USER", "ops@ibr.org")
        .env("EMAIL_PASS", "hunter2")
        .assert()
        .success()
        .stdout(predicate::str::contains("AIzaSy***"))
        .stdout(predicate::str::contains("VerySecretKey").not())
        .stdout(predicate::str::contains("hunter2").not())
        .stdout(predicate::str::contains("gemini-1.5-flash"));
}

#[test]
fn test_config_reads_dotenv() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".env"), "PORT=8088\n").unwrap();

    registry_cmd(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(":8088"));
}

#[test]
fn test_invalid_port_fails() {
    let dir = TempDir::new().unwrap();
    registry_cmd(&dir)
        .arg("config")
        .env("PORT", "not-a-port")
        .assert()
        .failure()
        .stderr(predicate::str::contains("EVT-030"))
        .stderr(predicate::str::contains("PORT"));
}

#[test]
fn test_unknown_command_fails() {
    let dir = TempDir::new().unwrap();
    registry_cmd(&dir).arg("frobnicate").assert().failure();
}
