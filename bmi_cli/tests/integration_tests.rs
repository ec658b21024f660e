//! Integration tests for the bmi binary.
//!
//! These tests verify end-to-end behavior including:
//! - Calculate and save workflow
//! - History listing and per-user filtering
//! - CSV export
//! - Trend chart output

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from any user config
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bmi"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn add(data_dir: &Path, name: &str, weight: &str, height: &str) {
    cli(data_dir)
        .args(["add", "--name", name, "--weight", weight, "--height", height])
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("bmi"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Body Mass Index tracker"));
}

#[test]
fn test_add_reports_bmi_and_category() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["add", "--name", "Bob", "--weight", "70", "--height", "1.75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry saved for Bob (#1)"))
        .stdout(predicate::str::contains("BMI: 22.86"))
        .stdout(predicate::str::contains("Category: Normal weight"));

    assert!(data_dir.join("bmi_history.db").exists());

    cli(data_dir)
        .args(["add", "--name", "Carol", "--weight", "120", "--height", "1.60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(#2)"))
        .stdout(predicate::str::contains("BMI: 46.88"))
        .stdout(predicate::str::contains("Category: Obese"));
}

#[test]
fn test_invalid_height_creates_nothing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["add", "--name", "Bob", "--weight", "70", "--height", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("height must be a number"));

    assert!(!data_dir.join("bmi_history.db").exists());

    add(data_dir, "Bob", "70", "1.75");
    cli(data_dir)
        .args(["add", "--name", "Bob", "--weight", "500.01", "--height", "1.75"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("weight"));

    let output = cli(data_dir).args(["history", "--json"]).output().unwrap();
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[test]
fn test_empty_name_rejected() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["add", "--name", "   ", "--weight", "70", "--height", "1.75"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name cannot be empty"));
}

#[test]
fn test_history_before_any_entry() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No history recorded yet."));
}

#[test]
fn test_history_filters_by_exact_name() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    add(data_dir, "Alice", "60", "1.65");
    add(data_dir, "alice", "61", "1.65");
    add(data_dir, "Bob", "80", "1.80");
    add(data_dir, "Alice", "62", "1.65");

    let output = cli(data_dir)
        .args(["history", "--name", "Alice", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], 1);
    assert_eq!(entries[1]["id"], 4);
    assert!(entries.iter().all(|e| e["name"] == "Alice"));

    cli(data_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob - BMI: 24.69 (Normal weight)"))
        .stdout(predicate::str::contains("alice"));
}

#[test]
fn test_show_entry() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    add(data_dir, "Bob", "70", "1.75");

    cli(data_dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Weight:   70.00 kg"))
        .stdout(predicate::str::contains("Height:   1.75 m"))
        .stdout(predicate::str::contains("BMI:      22.86"));

    cli(data_dir)
        .args(["show", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No entry with id 99"));
}

#[test]
fn test_export_writes_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let csv_path = data_dir.join("out.csv");

    add(data_dir, "Bob", "70", "1.75");
    add(data_dir, "Smith, Jo", "120", "1.60");

    cli(data_dir)
        .args(["export", "--output"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 entries"));

    let contents = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines[0], "id,name,weight_kg,height_m,bmi,category,created_at");
    assert!(lines[1].starts_with("1,Bob,70.00,1.75,22.86,Normal weight,"));
    assert!(lines[2].starts_with("2,\"Smith, Jo\",120.00,1.60,46.88,Obese,"));
}

#[test]
fn test_export_default_destination() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    add(data_dir, "Bob", "70", "1.75");
    cli(data_dir).arg("export").assert().success();

    assert!(data_dir.join("bmi_history.csv").exists());
}

#[test]
fn test_export_with_no_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("No history to export"));

    assert!(!data_dir.join("bmi_history.csv").exists());
}

#[test]
fn test_trend_chart() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    add(data_dir, "Alice", "60", "1.65");
    add(data_dir, "Alice", "66", "1.65");

    cli(data_dir)
        .args(["trend", "--name", "Alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI Trend - Alice"))
        .stdout(predicate::str::contains("24.24"))
        .stdout(predicate::str::contains("22.04"));

    cli(data_dir)
        .args(["trend", "--name", "Nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries found for Nobody"));
}

#[test]
fn test_config_file_is_honoured() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let config_dir = data_dir.join("config/bmi-tracker");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[data]\ndatabase_file = \"custom.db\"\n",
    )
    .unwrap();

    add(data_dir, "Bob", "70", "1.75");

    assert!(data_dir.join("custom.db").exists());
    assert!(!data_dir.join("bmi_history.db").exists());
}
