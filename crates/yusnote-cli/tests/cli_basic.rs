//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated config directory and verify
//! outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with its config under `config_dir`.
fn run_cli(config_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_yusnote-cli"))
        .env("YUSNOTE_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn parse_json(json: &str) -> serde_json::Value {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}

#[test]
fn test_review_adjust_json() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &[
            "review", "adjust", "--plan", "1,3,7,30", "--feedback", "0", "--last-feedback", "2",
            "--today", "2024-01-10", "--json",
        ],
    );
    assert_eq!(code, 0, "review adjust failed");

    let json = parse_json(&stdout);
    assert_eq!(json["new_plan"], "1.00,1.00,1.00,1.00");
    assert_eq!(json["new_stage"], 1);
    assert_eq!(json["next_review_date"], "2024-01-11");
}

#[test]
fn test_review_adjust_terminal_stage_text() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &[
            "review", "adjust", "--plan", "1,3,7,30", "--feedback", "3", "--last-feedback", "0",
            "--stage", "3", "--today", "2024-01-10",
        ],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("1.00,3.00,7.00,60.00"), "{stdout}");
    assert!(stdout.contains("Stage:       3"), "{stdout}");
    assert!(stdout.contains("2024-03-10"), "{stdout}");
}

#[test]
fn test_review_adjust_negative_stage_uses_default_plan() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["review", "adjust", "--stage", "-2", "--today", "2024-01-10", "--json"],
    );
    assert_eq!(code, 0);
    let json = parse_json(&stdout);
    assert_eq!(json["new_plan"], "1.00,3.00,7.00,30.00");
    assert_eq!(json["new_stage"], 1);
    assert_eq!(json["next_review_date"], "2024-01-13");
}

#[test]
fn test_review_adjust_malformed_plan_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["review", "adjust", "--plan", "1,x,7"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Malformed review plan"), "{stderr}");
}

#[test]
fn test_review_plan_normalizes() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["review", "plan", "1, 3,7.5"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1.00,3.00,7.50");
}

#[test]
fn test_history_record_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("history.json");
    let file = file.to_str().unwrap();

    for _ in 0..2 {
        let (code, _, stderr) = run_cli(
            dir.path(),
            &["history", "record", "--file", file, "--now", "2024-02-15T09:30:00"],
        );
        assert_eq!(code, 0, "{stderr}");
    }

    let (code, stdout, _) = run_cli(
        dir.path(),
        &["history", "show", "--file", file, "--month", "2024-02", "--json"],
    );
    assert_eq!(code, 0);
    let counters = parse_json(&stdout);
    let counters = counters.as_array().unwrap();
    assert_eq!(counters.len(), 29);
    assert_eq!(counters[14], 2);

    let (code, stdout, _) = run_cli(dir.path(), &["history", "show", "--file", file, "--json"]);
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout)["2024-02"], 2);
}

#[test]
fn test_history_record_evicts_old_months() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    let old = vec!["0"; 31].join(",");
    std::fs::write(&path, format!(r#"{{"2023-01": "{old}"}}"#)).unwrap();

    let (code, _, _) = run_cli(
        dir.path(),
        &["history", "record", "--file", path.to_str().unwrap(), "--now", "2024-06-01"],
    );
    assert_eq!(code, 0);

    let stored = parse_json(&std::fs::read_to_string(&path).unwrap());
    let keys: Vec<&String> = stored.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["2024-06"]);
}

#[test]
fn test_history_malformed_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(&path, r#"{"June": "1"}"#).unwrap();

    let (code, _, stderr) = run_cli(
        dir.path(),
        &["history", "record", "--file", path.to_str().unwrap()],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("June"), "{stderr}");
}

#[test]
fn test_punch_updates_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let state = path.to_str().unwrap();

    let (code, _, stderr) = run_cli(
        dir.path(),
        &["punch", "--state", state, "--feedback", "2", "--now", "2024-03-05T20:00:00"],
    );
    assert_eq!(code, 0, "{stderr}");

    let (code, stdout, _) = run_cli(
        dir.path(),
        &["punch", "--state", state, "--feedback", "0", "--now", "2024-03-08T20:00:00", "--json"],
    );
    assert_eq!(code, 0);
    let outcome = parse_json(&stdout);
    assert_eq!(outcome["stage"], 2);
    assert_eq!(outcome["review"]["new_plan"], "1.00,1.00,1.00,1.00");

    let stored = parse_json(&std::fs::read_to_string(&path).unwrap());
    assert_eq!(stored["item"]["stage"], 2);
    assert_eq!(stored["item"]["last_feedback"], 0);
    assert_eq!(stored["item"]["review_date"], "2024-03-09");
    assert_eq!(stored["item"]["last_review_date"], "2024-03-08");
    assert_eq!(stored["profile"]["review_plan"], "1.00,1.00,1.00,1.00");
    assert!(stored["profile"]["review_history"]["2024-03"].is_string());
}

#[test]
fn test_punch_reset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"item": {"stage": 2}}"#).unwrap();

    let (code, stdout, _) = run_cli(
        dir.path(),
        &["punch", "--state", path.to_str().unwrap(), "--reset", "--now", "2024-03-05", "--json"],
    );
    assert_eq!(code, 0);
    let outcome = parse_json(&stdout);
    assert_eq!(outcome["stage"], 0);
    assert_eq!(outcome["review"]["new_stage"], 3);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "review.max_interval"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "60.0");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "review.max_interval", "20"]);
    assert_eq!(code, 0);
    assert!(dir.path().join("config.toml").exists());

    let (code, stdout, _) = run_cli(
        dir.path(),
        &["review", "adjust", "--plan", "1,3,7,30", "--stage", "3", "--today", "2024-01-10", "--json"],
    );
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout)["new_plan"], "1.00,3.00,7.00,20.00");
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "get", "review.speed"]);
    assert_ne!(code, 0);

    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "review.speed", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("review.speed"), "{stderr}");
}

#[test]
fn test_config_list() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let json = parse_json(&stdout);
    assert_eq!(json["history"]["retention_days"], 90);
    assert_eq!(json["review"]["default_plan"], "1,3,7,30");
}
