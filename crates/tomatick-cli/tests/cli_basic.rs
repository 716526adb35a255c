//! Basic CLI E2E tests.
//!
//! Tests invoke the compiled binary directly and verify outputs. Every test
//! points HOME at a fresh temp directory so config state never leaks between
//! tests or into the host environment.

use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command against an isolated home directory.
fn run_cli(home: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_tomatick"))
        .args(args)
        .env("HOME", home.path())
        .env("TOMATICK_ENV", "dev")
        .output()
        .expect("failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("invalid JSON line"))
        .collect()
}

#[test]
fn run_emits_one_json_line_per_tick() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(
        &home,
        &[
            "run", "--start", "--interval-ms", "1", "--max-ticks", "3", "--json",
        ],
    );
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["display"], "24:59");
    assert_eq!(lines[0]["phase_index"], 0);
    assert_eq!(lines[0]["phase"], "Work");
    assert_eq!(lines[0]["phase_changed"], false);
    assert_eq!(lines[2]["display"], "24:57");
}

#[test]
fn run_without_start_reports_without_counting() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(
        &home,
        &["run", "--interval-ms", "1", "--max-ticks", "2", "--json"],
    );
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert_eq!(line["display"], "25:00");
        assert_eq!(line["phase_index"], 0);
    }
}

#[test]
fn run_honors_initial_phase() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(
        &home,
        &[
            "run", "--phase", "7", "--interval-ms", "1", "--max-ticks", "1", "--json",
        ],
    );
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    assert_eq!(lines[0]["display"], "20:00");
    assert_eq!(lines[0]["phase_index"], 7);
    assert_eq!(lines[0]["phase"], "Long Rest");
}

#[test]
fn run_rejects_out_of_range_phase() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["run", "--phase", "8", "--json"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("invalid phase"), "stderr: {stderr}");
}

#[test]
fn run_rolls_over_into_short_rest() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["config", "set", "timer.work_minutes", "1"]);
    assert_eq!(code, 0, "config set failed: {stdout}");

    // 60 ticks drain the one-minute work phase, the 61st rolls over.
    let (stdout, _, code) = run_cli(
        &home,
        &[
            "run", "--start", "--interval-ms", "1", "--max-ticks", "61", "--json",
        ],
    );
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    assert_eq!(lines.len(), 61);
    assert_eq!(lines[59]["display"], "00:00");
    assert_eq!(lines[59]["phase_index"], 0);
    let rollover = &lines[60];
    assert_eq!(rollover["display"], "05:00");
    assert_eq!(rollover["phase_index"], 1);
    assert_eq!(rollover["phase"], "Short Rest");
    assert_eq!(rollover["phase_changed"], true);
}

#[test]
fn run_plain_output_when_piped() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["run", "--interval-ms", "1", "--max-ticks", "1"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Work 25:00"), "stdout: {stdout}");
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["config", "set", "timer.work_minutes", "30"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, code) = run_cli(&home, &["config", "get", "timer.work_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");

    // The run loop picks up the new duration.
    let (stdout, _, code) = run_cli(
        &home,
        &[
            "run", "--start", "--interval-ms", "1", "--max-ticks", "1", "--json",
        ],
    );
    assert_eq!(code, 0);
    assert_eq!(json_lines(&stdout)[0]["display"], "29:59");
}

#[test]
fn config_rejects_zero_duration() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["config", "set", "timer.work_minutes", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("invalid value"), "stderr: {stderr}");
}

#[test]
fn config_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["config", "get", "timer.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"), "stderr: {stderr}");
}

#[test]
fn config_list_shows_all_sections() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("tick_interval_ms"));
    assert!(stdout.contains("notifications"));
}

#[test]
fn config_reset_restores_defaults() {
    let home = TempDir::new().unwrap();
    let (_, _, code) = run_cli(&home, &["config", "set", "timer.work_minutes", "30"]);
    assert_eq!(code, 0);
    let (_, _, code) = run_cli(&home, &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, code) = run_cli(&home, &["config", "get", "timer.work_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");
}
