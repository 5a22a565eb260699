//! Structured per-test logging.
#![allow(dead_code)]
//!
//! Each test creates a [`TestLogger`], marks its phases, and finishes with
//! [`TestLogger::finish_ok`]. Output goes to stderr, so it only shows up for
//! failing tests or with `--nocapture`.
//!
//! ```rust,ignore
//! let log = TestLogger::new("fallback_when_offline");
//! log.phase("setup");
//! // ...
//! log.phase("verify");
//! log.prediction("fallback", 3.1);
//! log.finish_ok();
//! ```
//!
//! # Environment Variables
//!
//! - `TEST_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//! - `TEST_LOG_JSON`: "1" or "true" for one JSON object per line
//! - `TEST_LOG_FILE`: also append every line to this file

use std::env;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use super::log_capture::TestLogCapture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

struct Settings {
    min_level: LogLevel,
    json: bool,
    file: Option<Mutex<File>>,
}

fn settings() -> &'static Settings {
    static SETTINGS: OnceLock<Settings> = OnceLock::new();
    SETTINGS.get_or_init(|| Settings {
        min_level: env::var("TEST_LOG_LEVEL")
            .ok()
            .and_then(|s| LogLevel::parse(&s))
            .unwrap_or(LogLevel::Info),
        json: env::var("TEST_LOG_JSON").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true")),
        file: env::var("TEST_LOG_FILE")
            .ok()
            .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok())
            .map(Mutex::new),
    })
}

#[derive(Serialize)]
struct Entry<'a> {
    timestamp: String,
    level: LogLevel,
    test: &'a str,
    phase: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u128>,
}

/// Per-test logger with phase and duration tracking.
pub struct TestLogger {
    name: String,
    started: Instant,
    phase: Mutex<String>,
}

impl TestLogger {
    pub fn new(name: &str) -> Self {
        let logger = Self {
            name: name.to_string(),
            started: Instant::now(),
            phase: Mutex::new("init".to_string()),
        };
        logger.emit(LogLevel::Info, "Test starting", None);
        logger
    }

    /// A logger plus a capture of the code under test's `tracing` events.
    pub fn with_capture(name: &str) -> (Self, TestLogCapture) {
        let capture = TestLogCapture::start();
        (Self::new(name), capture)
    }

    pub fn phase(&self, phase: &str) {
        if let Ok(mut current) = self.phase.lock() {
            *current = phase.to_string();
        }
        self.emit(LogLevel::Debug, &format!("Phase: {phase}"), None);
    }

    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message, None);
    }

    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message, None);
    }

    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Warn, message, None);
    }

    pub fn http_request(&self, method: &str, url: &str) {
        self.debug(&format!("HTTP {method} {url}"));
    }

    pub fn http_response(&self, status: u16, body: &str) {
        let preview: String = body.chars().take(200).collect();
        self.debug(&format!("HTTP {status}: {preview}"));
    }

    /// Record a prediction produced by the code under test.
    pub fn prediction(&self, method: &str, value: f64) {
        self.info(&format!("Prediction {value:.3} via {method}"));
    }

    pub fn finish_ok(&self) {
        let elapsed = self.started.elapsed().as_millis();
        self.emit(
            LogLevel::Info,
            &format!("Test passed ({elapsed}ms)"),
            Some(elapsed),
        );
    }

    pub fn finish_err(&self, reason: &str) {
        let elapsed = self.started.elapsed().as_millis();
        self.emit(
            LogLevel::Error,
            &format!("Test FAILED: {reason} ({elapsed}ms)"),
            Some(elapsed),
        );
    }

    fn emit(&self, level: LogLevel, message: &str, duration_ms: Option<u128>) {
        let settings = settings();
        if level < settings.min_level {
            return;
        }

        let phase = self
            .phase
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default();
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();

        let line = if settings.json {
            let entry = Entry {
                timestamp,
                level,
                test: &self.name,
                phase: &phase,
                message,
                duration_ms,
            };
            serde_json::to_string(&entry).unwrap_or_default()
        } else {
            format!(
                "{timestamp} {:<5} [{}::{phase}] {message}",
                level.label(),
                self.name
            )
        };

        eprintln!("{line}");
        if let Some(file) = &settings.file
            && let Ok(mut file) = file.lock()
        {
            let _ = writeln!(file, "{line}");
        }
    }
}
