//! Integration tests for the `slots` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the generate, merge
//! and mask subcommands through the actual binary, including stdin/stdout
//! piping, file I/O, configuration layering and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Base command with configuration isolated from the caller's environment.
fn slots() -> Command {
    let mut cmd = Command::cargo_bin("slots").unwrap();
    cmd.env_remove("SLOTS_CONFIG")
        .env_remove("SLOTS_DEFAULTS__MAX_RESULTS")
        .env_remove("SLOTS_DEFAULTS__HORIZON")
        .env_remove("RUST_LOG");
    cmd
}

fn slot_starts(stdout: &[u8]) -> Vec<String> {
    let value: Value = serde_json::from_slice(stdout).expect("stdout must be JSON");
    value
        .as_array()
        .expect("stdout must be a JSON array")
        .iter()
        .map(|s| s["start"].as_str().unwrap().to_string())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// generate
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn generate_from_file_respects_busy_and_active_hold() {
    let output = slots()
        .args(["generate", "-i", &fixture("request.json")])
        .args(["--now", "2026-03-16T07:00:00Z"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        slot_starts(&output.stdout),
        vec![
            "2026-03-16T08:30:00+00:00",
            "2026-03-16T09:30:00+00:00",
            "2026-03-16T10:00:00+00:00",
        ]
    );
}

#[test]
fn generate_ignores_expired_hold() {
    let output = slots()
        .args(["generate", "-i", &fixture("request.json")])
        .args(["--now", "2026-03-16T08:00:00Z"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        slot_starts(&output.stdout),
        vec![
            "2026-03-16T08:30:00+00:00",
            "2026-03-16T09:00:00+00:00",
            "2026-03-16T09:30:00+00:00",
        ]
    );
}

#[test]
fn generate_reads_stdin() {
    let input = std::fs::read_to_string(fixture("minimal_request.json")).unwrap();

    slots()
        .arg("generate")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stdout(predicate::str::contains("2026-03-16T08:00:00+00:00"));
}

#[test]
fn generate_writes_output_file() {
    let output_path = std::env::temp_dir().join("slots-test-generate-output.json");
    let _ = std::fs::remove_file(&output_path);

    slots()
        .args(["generate", "-i", &fixture("request.json"), "--pretty"])
        .args(["--now", "2026-03-16T07:00:00Z"])
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    assert!(content.contains('\n'), "pretty output spans lines");
    assert_eq!(slot_starts(content.as_bytes()).len(), 3);

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn config_file_supplies_page_defaults() {
    let output = slots()
        .args(["--config", &fixture("config.toml")])
        .args(["generate", "-i", &fixture("minimal_request.json")])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        slot_starts(&output.stdout),
        vec!["2026-03-16T08:00:00+00:00", "2026-03-16T09:00:00+00:00"]
    );
}

#[test]
fn environment_overrides_config_file() {
    let output = slots()
        .env("SLOTS_DEFAULTS__MAX_RESULTS", "1")
        .args(["--config", &fixture("config.toml")])
        .args(["generate", "-i", &fixture("minimal_request.json")])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(slot_starts(&output.stdout), vec!["2026-03-16T08:00:00+00:00"]);
}

#[test]
fn missing_config_file_fails() {
    slots()
        .args(["--config", "/nonexistent/slots.toml", "mask", "124"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn generate_rejects_invalid_mask() {
    slots()
        .arg("generate")
        .write_stdin(r#"{"start_date":"2026-03-16","session_minutes":30,"weekly_mask":0}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid weekly availability mask"));
}

#[test]
fn generate_rejects_malformed_json() {
    slots()
        .arg("generate")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse slot request"));
}

#[test]
fn generate_missing_input_file_fails() {
    slots()
        .args(["generate", "-i", "/nonexistent/request.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// merge
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn merge_minutes_from_stdin() {
    slots()
        .arg("merge")
        .write_stdin(r#"[{"start":50,"end":60},{"start":10,"end":30},{"start":30,"end":40}]"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"[{"start":10,"end":40},{"start":50,"end":60}]"#,
        ));
}

#[test]
fn merge_rejects_reversed_range() {
    slots()
        .arg("merge")
        .write_stdin(r#"[{"start":40,"end":30}]"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid interval"));
}

// ─────────────────────────────────────────────────────────────────────────────
// mask
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn mask_prints_weekday_table() {
    slots()
        .args(["mask", "124"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mon  available"))
        .stdout(predicate::str::contains("Sat  -"));
}

#[test]
fn mask_rejects_out_of_range() {
    slots()
        .args(["mask", "128"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 1..=127"));
}
