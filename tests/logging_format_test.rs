//! Integration tests for log output formats.

use assert_cmd::Command;

use trendcast::core::logging::{self, LogFormat, LogLevel, LogSettings};
use trendcast::{TestDir, assert_contains, assert_json_valid};

#[test]
fn init_is_repeatable_across_formats() {
    for format in [LogFormat::Human, LogFormat::Json, LogFormat::Compact] {
        logging::init(&LogSettings {
            level: LogLevel::Debug,
            format,
            file: None,
        });
    }
}

#[allow(deprecated)]
fn status_with_log_file(dir: &TestDir, extra: &[&str]) -> String {
    let log_path = dir.file_path("trendcast.log");
    Command::cargo_bin("trendcast")
        .expect("binary should build")
        .env_remove("RUST_LOG")
        .env_remove("TRENDCAST_LOG")
        .env_remove("TRENDCAST_LOG_FORMAT")
        .env("TRENDCAST_LOG_FILE", &log_path)
        .arg("--config")
        .arg(dir.file_path("missing.toml"))
        .args(["--ollama-url", "http://127.0.0.1:9", "--log-level", "debug"])
        .args(extra)
        .arg("status")
        .assert()
        .success();
    dir.read_file("trendcast.log").expect("log file should exist")
}

#[test]
fn json_logs_are_one_object_per_line() {
    let dir = TestDir::new();
    let content = status_with_log_file(&dir, &["--json-output"]);

    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    assert!(!lines.is_empty(), "expected debug logs in {content:?}");
    for line in &lines {
        assert_json_valid!(line);
    }
    assert_contains!(&content, "Configuration resolved");
}

#[test]
fn human_logs_name_the_event() {
    let dir = TestDir::new();
    let content = status_with_log_file(&dir, &[]);

    assert_contains!(&content, "Configuration resolved");
    assert_contains!(&content, "DEBUG");
}
