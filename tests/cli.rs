// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Integration tests for the lenses-cli binary.
//!
//! Every test runs in its own temporary directory and, where a
//! configuration is involved, points `--config` at a file inside it.

#![allow(deprecated)] // cargo_bin deprecation — replacement API not yet stable

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

const TWO_CONTEXTS: &str = "CurrentContext: dev
Contexts:
  dev:
    Host: dev:3030
    Token: dev-token
  prod:
    Host: prod.example.com:443
    BasicAuthentication:
      Username: admin
      Password: s3cr3t
    Timeout: 30s
";

/// Create a command that runs from a temporary directory with clean env.
fn lenses_cli_in_clean_dir(tmpdir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lenses-cli").unwrap(); //#[allow_ci]
    cmd.current_dir(tmpdir.path());
    cmd.env("HOME", tmpdir.path());
    for var in [
        "LENSES_HOST",
        "LENSES_TOKEN",
        "LENSES_USER",
        "LENSES_PASSWORD",
        "LENSES_TIMEOUT",
        "LENSES_CONTEXT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_config(tmpdir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = tmpdir.path().join(name);
    fs::write(&path, contents).unwrap(); //#[allow_ci]
    path
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| {
        panic!("Expected valid JSON output, got error: {e}\nstdout: {stdout}") //#[allow_ci]
    })
}

#[test]
fn test_no_args_shows_help() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    lenses_cli_in_clean_dir(&tmpdir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("configure"))
        .stdout(predicate::str::contains("use-context"));
}

#[test]
fn test_no_args_summarizes_explicit_config() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = write_config(&tmpdir, "lenses.yml", TWO_CONTEXTS);

    lenses_cli_in_clean_dir(&tmpdir)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("(YAML)"))
        .stderr(predicate::str::contains("Current context: dev (valid)"))
        .stderr(predicate::str::contains("Contexts: dev, prod"));
}

#[test]
fn test_version_flag_works() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    lenses_cli_in_clean_dir(&tmpdir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lenses-cli"));
}

#[test]
fn test_contexts_lists_every_context() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = write_config(&tmpdir, "lenses.yml", TWO_CONTEXTS);

    let output = lenses_cli_in_clean_dir(&tmpdir)
        .arg("--config")
        .arg(&config)
        .arg("contexts")
        .output()
        .unwrap(); //#[allow_ci]
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["current_context"], "dev");
    assert_eq!(json["contexts"][0]["name"], "dev");
    assert_eq!(json["contexts"][0]["host"], "http://dev:3030");
    assert_eq!(json["contexts"][1]["host"], "https://prod.example.com:443");
}

#[test]
fn test_contexts_table_format() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = write_config(&tmpdir, "lenses.yml", TWO_CONTEXTS);

    lenses_cli_in_clean_dir(&tmpdir)
        .args(["--format", "table", "contexts", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("current_context: dev"))
        .stdout(predicate::str::contains("NAME"));
}

#[test]
fn test_context_never_prints_secrets() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = write_config(&tmpdir, "lenses.yml", TWO_CONTEXTS);

    lenses_cli_in_clean_dir(&tmpdir)
        .args(["context", "prod", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"username\": \"admin\""))
        .stdout(predicate::str::contains("s3cr3t").not());
}

#[test]
fn test_context_applies_command_line_values() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = write_config(&tmpdir, "lenses.yml", TWO_CONTEXTS);

    let output = lenses_cli_in_clean_dir(&tmpdir)
        .arg("--config")
        .arg(&config)
        .args(["context", "--host", "other:9991"])
        .env("LENSES_TIMEOUT", "5s")
        .output()
        .unwrap(); //#[allow_ci]
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["name"], "dev");
    assert_eq!(json["host"], "http://other:9991");
    assert_eq!(json["timeout"], "5s");

    // Nothing is written back.
    let contents = fs::read_to_string(&config).unwrap(); //#[allow_ci]
    assert_eq!(contents, TWO_CONTEXTS);
}

#[test]
fn test_context_unknown_fails() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = write_config(&tmpdir, "lenses.yml", TWO_CONTEXTS);

    lenses_cli_in_clean_dir(&tmpdir)
        .args(["context", "staging", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("CONTEXT_NOT_FOUND"))
        .stdout(predicate::str::contains("\"context\": \"staging\""));
}

#[test]
fn test_missing_explicit_config_fails() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]

    lenses_cli_in_clean_dir(&tmpdir)
        .args(["contexts", "--config", "nope.yml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("CONFIG_NOT_FOUND"));
}

#[test]
fn test_undecodable_config_fails() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = write_config(&tmpdir, "lenses.json", "{ \"contexts\": ");

    lenses_cli_in_clean_dir(&tmpdir)
        .args(["--format", "table", "contexts", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not formatted to a compatible document"));
}

#[test]
fn test_use_context_saves_in_place() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = write_config(&tmpdir, "lenses.yml", TWO_CONTEXTS);

    lenses_cli_in_clean_dir(&tmpdir)
        .args(["use-context", "prod", "--config"])
        .arg(&config)
        .assert()
        .success();

    let contents = fs::read_to_string(&config).unwrap(); //#[allow_ci]
    assert!(contents.contains("CurrentContext: prod"));
    assert!(contents.contains("Password: s3cr3t"));
}

#[test]
fn test_use_context_keeps_json_stored_under_yaml_name() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = write_config(
        &tmpdir,
        "lenses.yml",
        r#"{
  "currentContext": "dev",
  "contexts": {
    "dev": {"host": "dev:3030", "token": "d"},
    "prod": {"host": "prod:443", "token": "p"}
  }
}"#,
    );

    lenses_cli_in_clean_dir(&tmpdir)
        .args(["use-context", "prod", "--config"])
        .arg(&config)
        .assert()
        .success();

    let contents = fs::read_to_string(&config).unwrap(); //#[allow_ci]
    let saved: serde_json::Value = serde_json::from_str(&contents).unwrap(); //#[allow_ci]
    assert_eq!(saved["currentContext"], "prod");
    assert_eq!(saved["contexts"]["dev"]["token"], "d");
}

#[test]
fn test_remove_last_valid_context_is_refused() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = write_config(
        &tmpdir,
        "lenses.yml",
        "CurrentContext: only\nContexts:\n  only:\n    Host: h\n    Token: t\n",
    );
    let before = fs::read_to_string(&config).unwrap(); //#[allow_ci]

    lenses_cli_in_clean_dir(&tmpdir)
        .args(["remove-context", "only", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("REMOVAL_REFUSED"));

    assert_eq!(fs::read_to_string(&config).unwrap(), before); //#[allow_ci]
}

#[test]
fn test_remove_current_context_switches() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = write_config(&tmpdir, "lenses.yml", TWO_CONTEXTS);

    let output = lenses_cli_in_clean_dir(&tmpdir)
        .args(["remove-context", "dev", "--config"])
        .arg(&config)
        .output()
        .unwrap(); //#[allow_ci]
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["current_context"], "prod");

    let contents = fs::read_to_string(&config).unwrap(); //#[allow_ci]
    assert!(contents.contains("CurrentContext: prod"));
    assert!(!contents.contains("dev-token"));
}

#[test]
fn test_logout_clears_tokens() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = write_config(&tmpdir, "lenses.yml", TWO_CONTEXTS);

    lenses_cli_in_clean_dir(&tmpdir)
        .args(["logout", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dev\""));

    let contents = fs::read_to_string(&config).unwrap(); //#[allow_ci]
    assert!(!contents.contains("dev-token"));
    assert!(contents.contains("Username: admin"));
}

#[test]
fn test_configure_non_interactive_creates_explicit_file() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = tmpdir.path().join("conf").join("lenses.json");

    lenses_cli_in_clean_dir(&tmpdir)
        .args([
            "configure",
            "--non-interactive",
            "--host",
            "lenses.example.com:443",
            "--user",
            "admin",
            "--pass",
            "admin",
            "--config",
        ])
        .arg(&config)
        .assert()
        .success();

    let contents = fs::read_to_string(&config).unwrap(); //#[allow_ci]
    assert!(contents.contains("\"currentContext\": \"master\""));
    assert!(contents.contains("\"host\": \"https://lenses.example.com:443\""));
    assert!(contents.contains("\"basic_authentication\""));
}

#[test]
fn test_configure_non_interactive_kerberos_from_env() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = tmpdir.path().join("lenses-cli.yml");

    lenses_cli_in_clean_dir(&tmpdir)
        .args([
            "configure",
            "--non-interactive",
            "--context",
            "krb",
            "--kerberos-conf",
            "/etc/krb5.conf",
            "--kerberos-keytab",
            "/etc/svc.keytab",
            "--config",
        ])
        .arg(&config)
        .env("LENSES_HOST", "https://krb.example.com")
        .env("LENSES_USER", "svc")
        .assert()
        .success();

    let contents = fs::read_to_string(&config).unwrap(); //#[allow_ci]
    assert!(contents.contains("CurrentContext: krb"));
    assert!(contents.contains("https://krb.example.com:443"));
    assert!(contents.contains("KeytabFile: /etc/svc.keytab"));
}

#[test]
fn test_configure_non_interactive_incomplete_fails() {
    let tmpdir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let config = tmpdir.path().join("lenses-cli.yml");

    lenses_cli_in_clean_dir(&tmpdir)
        .args(["configure", "--non-interactive", "--host", "lenses", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("VALIDATION_ERROR"));

    assert!(!config.exists());
}
