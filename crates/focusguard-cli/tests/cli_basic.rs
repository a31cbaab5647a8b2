//! Basic CLI E2E tests.
//!
//! Each test runs the built binary with HOME pointed at a temp directory so the
//! user's real config is never touched.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_focusguard-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("FOCUSGUARD_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (code, stdout, stderr)
}

fn write_trace(dir: &Path, lines: &[String]) -> String {
    let path = dir.join("trace.jsonl");
    std::fs::write(&path, lines.join("\n")).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_config_get_default() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "timer.focus_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");
    assert!(home.path().join(".config/focusguard/config.toml").exists());
}

#[test]
fn test_config_set_persists() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["config", "set", "engagement.threshold", "40"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "engagement.threshold"]);
    assert_eq!(stdout.trim(), "40.0");
}

#[test]
fn test_config_set_rejects_out_of_range() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "timer.focus_minutes", "999"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_config_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_preset() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["config", "preset", "50/10"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "timer.short_break_minutes"]);
    assert_eq!(stdout.trim(), "10");
}

#[test]
fn test_replay_json_reports_pause() {
    let home = tempfile::tempdir().unwrap();
    let mut lines = vec![
        r#"{"at_ms": 0, "kind": "shield", "enabled": true}"#.to_string(),
        r#"{"at_ms": 0, "kind": "grant"}"#.to_string(),
        r#"{"at_ms": 0, "kind": "start"}"#.to_string(),
    ];
    for t in (100..=3_000).step_by(100) {
        lines.push(format!(r#"{{"at_ms": {t}, "kind": "faces", "faces": []}}"#));
    }
    let trace = write_trace(home.path(), &lines);

    let (code, stdout, _) = run_cli(home.path(), &["replay", &trace, "--json"]);
    assert_eq!(code, 0);
    let kinds: Vec<String> = stdout
        .lines()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            v["type"].as_str().unwrap().to_string()
        })
        .collect();
    assert!(kinds.iter().any(|k| k == "PausedByAttention"));
}

#[test]
fn test_replay_rejects_malformed_trace() {
    let home = tempfile::tempdir().unwrap();
    let trace = write_trace(home.path(), &["not json".to_string()]);
    let (code, _, stderr) = run_cli(home.path(), &["replay", &trace]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Line 1"));
}

#[test]
fn test_replay_missing_trace_file() {
    let home = tempfile::tempdir().unwrap();
    let missing = home.path().join("nope.jsonl");
    let (code, _, stderr) = run_cli(home.path(), &["replay", &missing.to_string_lossy()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Cannot read"));
    assert!(stderr.contains("nope.jsonl"));
}

#[test]
fn test_summary_after_focus_session() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["config", "set", "timer.focus_minutes", "1"]);
    assert_eq!(code, 0);

    let lines = vec![r#"{"at_ms": 0, "kind": "start"}"#.to_string()];
    let trace = write_trace(home.path(), &lines);
    let (code, stdout, _) = run_cli(
        home.path(),
        &["summary", &trace, "--until-ms", "61000", "--json"],
    );
    assert_eq!(code, 0);
    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["minutes"], 1);
    assert_eq!(rows[0]["summary"]["samples"], 60);
}

#[test]
fn test_completions() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("focusguard-cli"));
}
