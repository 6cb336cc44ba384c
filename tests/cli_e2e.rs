//! End-to-end CLI tests for xstatus.
//!
//! These tests run the actual xstatus binary and verify:
//! - Command-line interface behavior
//! - Output format and content
//! - Error handling and messages
//!
//! # Test Organization
//!
//! Tests are organized by command:
//! - `test_parse_*` - Parse command tests
//! - `test_mentions_*` - Mentions command tests
//! - `test_display_*` - Display command tests
//! - `test_config_*` - Config command tests
//! - `test_cli_*` - General CLI tests (flags, help, version)
//!
//! # Logging
//!
//! All tests log start/end timestamps and timing to stderr.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

/// Log a test event with timestamp
macro_rules! test_log {
    ($($arg:tt)*) => {
        let timestamp = chrono::Utc::now().format("%H:%M:%S%.3f");
        eprintln!("[TEST {}] {}", timestamp, format!($($arg)*));
    };
}

/// Write `content` to a payload file in a fresh temp directory.
fn write_payload(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join(name);
    fs::write(&path, content).expect("Failed to write payload");
    (temp_dir, path)
}

/// Get the xstatus command ready for testing, isolated from user config.
fn xstatus_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("xstatus");
    cmd.env("XSTATUS_CONFIG", config_dir.path().join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("XSTATUS_FORMAT")
        .env_remove("XSTATUS_CASE_SENSITIVE")
        .env_remove("XSTATUS_QUIET")
        .env_remove("RUST_LOG");
    cmd
}

// =============================================================================
// Sample Test Data
// =============================================================================

const SAMPLE_TIMELINE: &str = r#"[
    {
        "id_str": "1001",
        "text": "hello @Bob and bob@example.com &amp; friends",
        "created_at": "Sun Nov 01 00:00:00 +0000 2009",
        "source": "web",
        "retweet_count": 4,
        "user": {"id_str": "10", "screen_name": "carol", "name": "Carol"}
    },
    null,
    {
        "id_str": "1002",
        "text": "See: http://t.co/abcdefghijk here",
        "created_at": "Sun Nov 01 01:00:00 +0000 2009",
        "source": "web",
        "entities": {"urls": [{
            "url": "http://t.co/abcdefghijk",
            "display_url": "example.com",
            "indices": [5, 28]
        }]}
    }
]"#;

const SAMPLE_SEARCH: &str = r#"{"results": [
    {
        "id_str": "7",
        "text": "found @Dave",
        "from_user": "alice",
        "profile_image_url": "http://img/a.png",
        "created_at": "Sun, 01 Nov 2009 00:00:00 +0000",
        "source": "&lt;a href=&quot;http://x.com&quot;&gt;x&lt;/a&gt;"
    }
]}"#;

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_cli_help() {
    test_log!("Starting test_cli_help");
    let start = Instant::now();
    let config_dir = TempDir::new().unwrap();

    xstatus_cmd(&config_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("xstatus"))
        .stdout(predicate::str::contains("Usage"));

    test_log!("test_cli_help completed in {:?}", start.elapsed());
}

#[test]
fn test_cli_version() {
    test_log!("Starting test_cli_version");
    let start = Instant::now();
    let config_dir = TempDir::new().unwrap();

    xstatus_cmd(&config_dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xstatus"));

    test_log!("test_cli_version completed in {:?}", start.elapsed());
}

#[test]
fn test_cli_no_args() {
    test_log!("Starting test_cli_no_args");
    let config_dir = TempDir::new().unwrap();

    let output = xstatus_cmd(&config_dir).output().expect("Failed to run command");
    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_invalid_command() {
    let config_dir = TempDir::new().unwrap();
    xstatus_cmd(&config_dir)
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("frobnicate"));
}

// =============================================================================
// Parse Command Tests
// =============================================================================

#[test]
fn test_parse_timeline_text() {
    test_log!("Starting test_parse_timeline_text");
    let start = Instant::now();
    let config_dir = TempDir::new().unwrap();
    let (_dir, path) = write_payload("timeline.json", SAMPLE_TIMELINE);

    xstatus_cmd(&config_dir)
        .arg("parse")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 statuses"))
        .stdout(predicate::str::contains("@carol"))
        .stdout(predicate::str::contains("hello @Bob and bob@example.com & friends"))
        .stdout(predicate::str::contains("retweets: 4"))
        .stdout(predicate::str::contains("retweets: unknown"));

    test_log!("test_parse_timeline_text completed in {:?}", start.elapsed());
}

#[test]
fn test_parse_json_output() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, path) = write_payload("timeline.json", SAMPLE_TIMELINE);

    let output = xstatus_cmd(&config_dir)
        .args(["parse", "--format", "json"])
        .arg(&path)
        .output()
        .expect("Failed to run command");
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let statuses = parsed.as_array().expect("array of statuses");
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0]["id"], "1001");
    assert_eq!(statuses[0]["user"]["screen_name"], "carol");
}

#[test]
fn test_parse_stdin() {
    let config_dir = TempDir::new().unwrap();
    xstatus_cmd(&config_dir)
        .args(["parse", "-"])
        .write_stdin(SAMPLE_TIMELINE)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 statuses"));
}

#[test]
fn test_parse_empty_input() {
    let config_dir = TempDir::new().unwrap();
    xstatus_cmd(&config_dir)
        .args(["parse", "--format", "json", "-"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_parse_invalid_json() {
    test_log!("Starting test_parse_invalid_json");
    let config_dir = TempDir::new().unwrap();
    let (_dir, path) = write_payload("broken.json", "not json");

    xstatus_cmd(&config_dir)
        .arg("parse")
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse status payload"))
        .stderr(predicate::str::contains("not json"));
}

#[test]
fn test_parse_missing_file() {
    let config_dir = TempDir::new().unwrap();
    xstatus_cmd(&config_dir)
        .args(["parse", "/nonexistent/payload.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_parse_search() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, path) = write_payload("search.json", SAMPLE_SEARCH);

    xstatus_cmd(&config_dir)
        .args(["parse", "--search"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("@alice"))
        .stdout(predicate::str::contains("found @Dave"));
}

#[test]
fn test_search_payload_without_flag_fails() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, path) = write_payload("search.json", SAMPLE_SEARCH);

    xstatus_cmd(&config_dir)
        .arg("parse")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--search"));
}

// =============================================================================
// Mentions Command Tests
// =============================================================================

#[test]
fn test_mentions_lowercased_by_default() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, path) = write_payload("timeline.json", SAMPLE_TIMELINE);

    xstatus_cmd(&config_dir)
        .args(["mentions", "--quiet"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1001 @bob"))
        .stdout(predicate::str::contains("@example").not())
        .stdout(predicate::str::contains("statuses").not());
}

#[test]
fn test_mentions_case_sensitive_flag() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, path) = write_payload("timeline.json", SAMPLE_TIMELINE);

    let output = xstatus_cmd(&config_dir)
        .args(["mentions", "--case-sensitive", "--format", "json"])
        .arg(&path)
        .output()
        .expect("Failed to run command");
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["mentions"], serde_json::json!(["Bob"]));
    assert_eq!(rows[1]["mentions"], serde_json::json!([]));
}

#[test]
fn test_mentions_case_sensitive_from_env() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, path) = write_payload("search.json", SAMPLE_SEARCH);

    xstatus_cmd(&config_dir)
        .env("XSTATUS_CASE_SENSITIVE", "true")
        .args(["mentions", "--search", "--quiet"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("7 @Dave"));
}

// =============================================================================
// Display Command Tests
// =============================================================================

#[test]
fn test_display_expands_urls() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, path) = write_payload("timeline.json", SAMPLE_TIMELINE);

    xstatus_cmd(&config_dir)
        .arg("display")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("See: example.com here"))
        .stdout(predicate::str::contains("t.co").not());
}

#[test]
fn test_display_json_pretty() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, path) = write_payload("timeline.json", SAMPLE_TIMELINE);

    xstatus_cmd(&config_dir)
        .args(["display", "--format", "json-pretty"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"text\": \"See: example.com here\""));
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_init_and_show() {
    test_log!("Starting test_config_init_and_show");
    let config_dir = TempDir::new().unwrap();

    xstatus_cmd(&config_dir)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));
    assert!(config_dir.path().join("config.toml").exists());

    xstatus_cmd(&config_dir)
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[parser]"))
        .stdout(predicate::str::contains("lookup_degenerate_users = true"));
}

#[test]
fn test_config_set_applies_to_next_run() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, path) = write_payload("timeline.json", SAMPLE_TIMELINE);

    xstatus_cmd(&config_dir)
        .args(["config", "--set", "output.format=json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("output.format"));

    let output = xstatus_cmd(&config_dir)
        .arg("display")
        .arg(&path)
        .output()
        .expect("Failed to run command");
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
}

#[test]
fn test_config_set_unknown_key_suggests() {
    let config_dir = TempDir::new().unwrap();

    xstatus_cmd(&config_dir)
        .args(["config", "--set", "output.formt=json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"))
        .stderr(predicate::str::contains("output.format"));
}

#[test]
fn test_config_set_bad_value() {
    let config_dir = TempDir::new().unwrap();

    xstatus_cmd(&config_dir)
        .args(["config", "--set", "parser.parallel=maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parser.parallel"));
}

#[test]
fn test_broken_config_file_is_reported() {
    let config_dir = TempDir::new().unwrap();
    fs::write(config_dir.path().join("config.toml"), "[parser\n").unwrap();

    xstatus_cmd(&config_dir)
        .args(["config", "--show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

// =============================================================================
// Completions and Modes
// =============================================================================

#[test]
fn test_completions_bash() {
    let config_dir = TempDir::new().unwrap();
    xstatus_cmd(&config_dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("xstatus"));
}

#[test]
fn test_verbose_mode() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, path) = write_payload("timeline.json", SAMPLE_TIMELINE);

    xstatus_cmd(&config_dir)
        .args(["parse", "--verbose"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Operation completed"));
}

#[test]
fn test_parse_performance_basic() {
    test_log!("Starting test_parse_performance_basic");
    let config_dir = TempDir::new().unwrap();

    let items: Vec<String> = (0..2_000)
        .map(|i| {
            format!(
                r#"{{"id_str":"{i}","text":"status {i} @user{i}","created_at":"Sun Nov 01 00:00:00 +0000 2009","source":"web"}}"#
            )
        })
        .collect();
    let (_dir, path) = write_payload("big.json", &format!("[{}]", items.join(",")));

    let start = Instant::now();
    xstatus_cmd(&config_dir)
        .args(["parse", "--quiet", "--format", "json"])
        .arg(&path)
        .assert()
        .success();
    let elapsed = start.elapsed();

    test_log!("Parsed 2000 statuses in {:?}", elapsed);
    assert!(elapsed.as_secs() < 30, "parse took {elapsed:?}");
}
