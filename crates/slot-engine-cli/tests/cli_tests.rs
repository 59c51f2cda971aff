//! Integration tests for the `slots` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the grid, check,
//! windows and book subcommands through the actual binary, with appointment and
//! preference fixtures.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the appointments fixture.
fn appointments_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/appointments.json")
}

/// Helper: path to the 08:00-18:00, 90-minute-gap preferences fixture.
fn preferences_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/preferences.json")
}

fn bad_preferences_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/bad_preferences.json")
}

/// Helper: a `slots` command with the shared fixtures and a fixed "now" before
/// business hours.
fn slots(subcommand: &str) -> Command {
    let mut cmd = Command::cargo_bin("slots").unwrap();
    cmd.args([
        subcommand,
        "--date",
        "2026-03-16",
        "-a",
        appointments_path(),
        "-p",
        preferences_path(),
        "--now",
        "2026-03-16T07:00",
    ]);
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// grid
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn grid_text_output_classifies_slots() {
    slots("grid")
        .args(["--duration", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("08:00  available"))
        .stdout(predicate::str::contains(
            "09:00  advisory: Too close to another appointment: 30 min gap, 90 recommended",
        ))
        .stdout(predicate::str::contains("10:00  blocked"))
        .stdout(predicate::str::contains("17:30"))
        .stdout(predicate::str::contains("18:00").not());
}

#[test]
fn grid_ignores_cancelled_appointment() {
    // a2 (15:00, cancelled) must not block its slot.
    slots("grid")
        .args(["--duration", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("15:00  available"));
}

#[test]
fn grid_json_output_is_an_array_of_slots() {
    let output = slots("grid")
        .args(["--duration", "30", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let slots = value.as_array().expect("grid JSON must be an array");
    assert_eq!(slots.len(), 20);
    assert_eq!(slots[0]["start_time"], "08:00");
    assert_eq!(slots[0]["available"], true);
    assert!(slots[0]["warning"].is_null());

    let ten = slots.iter().find(|s| s["start_time"] == "10:00").unwrap();
    assert_eq!(ten["available"], false);
}

#[test]
fn grid_with_editing_frees_the_edited_slot() {
    slots("grid")
        .args(["--duration", "60", "--editing", "a1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10:00  available"));
}

#[test]
fn grid_zero_duration_fails() {
    slots("grid")
        .args(["--duration", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn grid_bad_preferences_fail() {
    Command::cargo_bin("slots")
        .unwrap()
        .args([
            "grid",
            "--date",
            "2026-03-16",
            "--duration",
            "30",
            "-p",
            bad_preferences_path(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid preferences"));
}

#[test]
fn grid_missing_appointments_file_fails() {
    Command::cargo_bin("slots")
        .unwrap()
        .args([
            "grid",
            "--date",
            "2026-03-16",
            "--duration",
            "30",
            "-a",
            "/nonexistent/appointments.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_clean_time() {
    slots("check")
        .args(["--start", "13:00", "--duration", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("13:00  available"));
}

#[test]
fn check_overlapping_time_is_blocked() {
    slots("check")
        .args(["--start", "10:15", "--duration", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10:15  blocked"));
}

#[test]
fn check_gap_warning() {
    slots("check")
        .args(["--start", "12:15", "--duration", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("75 min gap, 90 recommended"));
}

#[test]
fn check_past_time_warning() {
    Command::cargo_bin("slots")
        .unwrap()
        .args([
            "check",
            "--date",
            "2026-03-16",
            "--start",
            "09:00",
            "--duration",
            "30",
            "-a",
            appointments_path(),
            "-p",
            preferences_path(),
            "--now",
            "2026-03-16T12:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("in the past"))
        .stdout(predicate::str::contains("min gap").not());
}

#[test]
fn check_json_output() {
    let output = slots("check")
        .args(["--start", "09:00", "--duration", "30", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["available"], true);
    assert!(value["warning"].as_str().unwrap().contains("30 min gap"));
}

#[test]
fn check_invalid_start_time_fails() {
    slots("check")
        .args(["--start", "nine", "--duration", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid start time"));
}

// ─────────────────────────────────────────────────────────────────────────────
// windows
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn windows_lists_gaps_around_appointments() {
    slots("windows")
        .assert()
        .success()
        .stdout(predicate::str::contains("08:00-10:00  120 min"))
        .stdout(predicate::str::contains("11:00-18:00  420 min"));
}

#[test]
fn windows_min_duration_filters() {
    slots("windows")
        .args(["--min-duration", "180"])
        .assert()
        .success()
        .stdout(predicate::str::contains("08:00-10:00").not())
        .stdout(predicate::str::contains("11:00-18:00"));
}

// ─────────────────────────────────────────────────────────────────────────────
// book
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn book_clean_slot_prints_created_appointment() {
    slots("book")
        .args(["--start", "13:00", "--duration", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"start_time\": \"13:00\""))
        .stdout(predicate::str::contains("\"duration_minutes\": 30"));
}

#[test]
fn book_advisory_slot_without_confirm_exits_2() {
    slots("book")
        .args(["--start", "09:00", "--duration", "30"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("needs confirmation"))
        .stdout(predicate::str::contains("--confirm"));
}

#[test]
fn book_advisory_slot_with_confirm_succeeds() {
    slots("book")
        .args(["--start", "09:00", "--duration", "30", "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"start_time\": \"09:00\""));
}

#[test]
fn book_blocked_slot_fails() {
    slots("book")
        .args(["--start", "10:30", "--duration", "30", "--confirm"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unavailable"));
}

#[test]
fn book_new_appointment_requires_duration() {
    slots("book")
        .args(["--start", "13:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--duration is required"));
}

#[test]
fn book_edit_moves_existing_appointment() {
    slots("book")
        .args(["--start", "10:30", "--editing", "a1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"a1\""))
        .stdout(predicate::str::contains("\"start_time\": \"10:30\""))
        .stdout(predicate::str::contains("\"duration_minutes\": 60"));
}

#[test]
fn book_save_writes_appointments_file() {
    let path = std::env::temp_dir().join("slots-test-book-save.json");
    std::fs::copy(appointments_path(), &path).unwrap();

    Command::cargo_bin("slots")
        .unwrap()
        .args([
            "book",
            "--date",
            "2026-03-16",
            "--start",
            "13:00",
            "--duration",
            "45",
            "-p",
            preferences_path(),
            "--now",
            "2026-03-16T07:00",
            "--save",
            "-a",
        ])
        .arg(&path)
        .assert()
        .success();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let saved = saved.as_array().unwrap();
    assert_eq!(saved.len(), 4, "the new booking is appended");
    assert!(saved
        .iter()
        .any(|a| a["start_time"] == "13:00" && a["duration_minutes"] == 45));

    let _ = std::fs::remove_file(&path);
}
