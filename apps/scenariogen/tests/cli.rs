//! Binary-level checks that never reach the network.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCRUBBED: &[&str] = &[
    "GOOGLE_API_KEY",
    "OPENAI_API_KEY",
    "SCENARIOGEN_LLM_API_KEY",
    "SCENARIOGEN_LLM_PROVIDER",
    "SCENARIOGEN_LLM_ENDPOINT",
    "SCENARIOGEN_OUT_DIR",
    "SCENARIOGEN_CONFIG",
    "GITHUB_TOKEN",
    "GITHUB_REPO_OWNER",
    "GITHUB_REPO_NAME",
    "NO_UPLOAD",
    "REQUIREMENT",
    "SQUAD",
    "FILE_NAME",
    "FILENAME",
    "TAG",
    "OTHER_TAGS",
    "RUST_LOG",
];

/// The binary, run from an empty directory so no stray .env is picked up.
fn scenariogen(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("scenariogen").unwrap();
    cmd.current_dir(dir.path());
    for name in SCRUBBED {
        cmd.env_remove(name);
    }
    cmd
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    scenariogen(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scenarios"))
        .stdout(predicate::str::contains("headless"));
}

#[test]
fn scenarios_help_shows_flags() {
    let dir = TempDir::new().unwrap();
    scenariogen(&dir)
        .args(["scenarios", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--requirement"))
        .stdout(predicate::str::contains("--with-test-code"))
        .stdout(predicate::str::contains("--no-upload"));
}

#[test]
fn missing_requirement_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    scenariogen(&dir)
        .args(["scenarios", "--squad", "checkout"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--requirement"));
}

#[test]
fn missing_api_key_is_reported_before_any_request() {
    let dir = TempDir::new().unwrap();
    scenariogen(&dir)
        .args(["scenarios", "-r", "user can pay", "-s", "checkout", "--no-upload"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error: [configuration]"))
        .stderr(predicate::str::contains("GOOGLE_API_KEY"));
    assert!(!dir.path().join("test-cases").exists());
}

#[test]
fn publishing_without_token_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    scenariogen(&dir)
        .env("GOOGLE_API_KEY", "dummy")
        .args(["headless", "-r", "user can pay", "-s", "checkout"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("GITHUB_TOKEN"))
        .stderr(predicate::str::contains("NO_UPLOAD"));
}

#[test]
fn unusable_squad_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    scenariogen(&dir)
        .env("GOOGLE_API_KEY", "dummy")
        .env("NO_UPLOAD", "true")
        .args(["scenarios", "-r", "user can pay", "-s", "!!!"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("squad"));
}

#[test]
fn broken_config_file_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("scenariogen.yaml"), "llm: [not, a, map]\n").unwrap();
    scenariogen(&dir)
        .env("GOOGLE_API_KEY", "dummy")
        .args([
            "--config",
            "scenariogen.yaml",
            "scenarios",
            "-r",
            "user can pay",
            "-s",
            "checkout",
            "--no-upload",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("scenariogen.yaml"));
}

#[test]
fn unreachable_backend_is_a_generation_error_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    scenariogen(&dir)
        .env("GOOGLE_API_KEY", "dummy")
        .env("SCENARIOGEN_LLM_ENDPOINT", "http://127.0.0.1:1")
        .env("SCENARIOGEN_LLM_TIMEOUT_SECS", "5")
        .args(["scenarios", "-r", "user can pay", "-s", "checkout", "--no-upload"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error: [generation]"));
    assert!(!dir.path().join("test-cases").exists());
}

#[test]
fn environment_supplies_required_inputs() {
    let dir = TempDir::new().unwrap();
    scenariogen(&dir)
        .env("REQUIREMENT", "user can pay")
        .env("SQUAD", "checkout")
        .env("NO_UPLOAD", "yes")
        .arg("scenarios")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("GOOGLE_API_KEY"));
}
