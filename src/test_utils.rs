//! Shared test helpers: record and stream factories, a throwaway dataset
//! directory, and assertion macros.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trendcast::test_utils::*;
//!
//! let records = make_test_records();
//! let dir = TestDir::new();
//! dir.write_projects(&records);
//! ```

use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::models::{PerformanceRecord, SalesPoint};
use crate::core::synthetic::MONTHS;
use crate::storage::datasets::{PROJECTS_FILE, SALES_FILE};

// =============================================================================
// Test Data Factories
// =============================================================================

/// Create a `PerformanceRecord` from a `YYYY-MM-DD` date string.
///
/// # Panics
///
/// Panics if the date does not parse.
///
/// # Examples
///
/// ```rust,ignore
/// use trendcast::test_utils::make_test_record;
///
/// let record = make_test_record("Emma Wilson", "Finance", 4.5, "2024-05-01");
/// assert_eq!(record.category, "Finance");
/// ```
#[must_use]
pub fn make_test_record(user: &str, category: &str, ranking: f64, date: &str) -> PerformanceRecord {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("test date must be YYYY-MM-DD");
    PerformanceRecord::new(user, category, ranking, date)
}

/// A small team history with known statistics.
///
/// Emma Wilson in Finance: 3.0, 3.5, 4.0 by date (average 3.5, trend +0.5).
/// Emma Wilson overall: five records averaging 3.4.
/// Finance overall: four records averaging 3.25.
#[must_use]
pub fn make_test_records() -> Vec<PerformanceRecord> {
    vec![
        make_test_record("Emma Wilson", "Finance", 3.0, "2024-01-10"),
        make_test_record("Emma Wilson", "Retail", 2.5, "2024-02-01"),
        make_test_record("Emma Wilson", "Finance", 3.5, "2024-03-15"),
        make_test_record("John Smith", "Finance", 2.5, "2024-04-02"),
        make_test_record("Emma Wilson", "Energy", 4.0, "2024-05-20"),
        make_test_record("Emma Wilson", "Finance", 4.0, "2024-06-30"),
        make_test_record("John Smith", "Retail", 4.5, "2024-07-04"),
    ]
}

/// Create a sales series from values, labelled `Jan 2024`, `Feb 2024`, ...
#[must_use]
pub fn make_test_sales_series(values: &[f64]) -> Vec<SalesPoint> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| SalesPoint {
            month: format!("{} {}", MONTHS[index % 12], 2024 + index / 12),
            value,
        })
        .collect()
}

/// One NDJSON line as the generate endpoint streams it.
#[must_use]
pub fn make_stream_line(response: &str, done: bool) -> String {
    let line = serde_json::json!({
        "model": "llama2",
        "created_at": "2024-06-01T12:00:00Z",
        "response": response,
        "done": done,
    });
    format!("{line}\n")
}

/// A full NDJSON body streaming `fragments` followed by a final `done` line.
#[must_use]
pub fn make_stream_body(fragments: &[&str]) -> String {
    let mut body: String = fragments
        .iter()
        .map(|fragment| make_stream_line(fragment, false))
        .collect();
    body.push_str(&make_stream_line("", true));
    body
}

/// Create sample config TOML content for testing.
#[must_use]
pub fn make_test_config_toml() -> String {
    r#"[server]
host = "127.0.0.1"
port = 3000

[remote]
base_url = "http://localhost:11434"
model = "llama2"
timeout_seconds = 30

[data]
sales_file = "data.json"
projects_file = "project-data.json"

[prediction]
seed = 42
"#
    .to_string()
}

// =============================================================================
// Dataset Directory
// =============================================================================

/// A throwaway data directory, removed on drop.
///
/// ```rust,ignore
/// let dir = TestDir::new();
/// dir.write_projects(&make_test_records());
/// let records = load_projects(&dir.file_path(PROJECTS_FILE)).await?;
/// ```
pub struct TestDir {
    root: tempfile::TempDir,
}

impl TestDir {
    /// # Panics
    ///
    /// Panics if no temporary directory can be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("temp dir should be creatable"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    #[must_use]
    pub fn file_exists(&self, name: &str) -> bool {
        self.file_path(name).is_file()
    }

    /// Write `content` to `name`, creating intermediate directories.
    ///
    /// # Panics
    ///
    /// Panics on any I/O failure.
    pub fn create_file(&self, name: &str, content: &str) {
        let target = self.file_path(name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).expect("parent dirs should be creatable");
        }
        fs::write(&target, content)
            .unwrap_or_else(|e| panic!("cannot write {}: {e}", target.display()));
    }

    /// Write a sales series as the default sales file.
    ///
    /// # Panics
    ///
    /// Panics if the series cannot be written.
    pub fn write_sales(&self, points: &[SalesPoint]) {
        self.write_json(SALES_FILE, points);
    }

    /// Write records as the default project file.
    ///
    /// # Panics
    ///
    /// Panics if the records cannot be written.
    pub fn write_projects(&self, records: &[PerformanceRecord]) {
        self.write_json(PROJECTS_FILE, records);
    }

    fn write_json<T: serde::Serialize + ?Sized>(&self, name: &str, value: &T) {
        let json = serde_json::to_string_pretty(value).expect("fixture data serializes");
        self.create_file(name, &json);
    }

    /// # Errors
    ///
    /// Returns the read error, e.g. when the file does not exist.
    pub fn read_file(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.file_path(name))
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Assertion Macros
// =============================================================================

/// `assert_contains!(haystack, needle)`, with an optional custom message.
///
/// Pass `&String` rather than `String`; the haystack is bound by value.
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {{
        let (haystack, needle) = ($haystack, $needle);
        assert!(
            haystack.contains(needle),
            "{:?} not found in:\n{}",
            needle,
            haystack
        );
    }};
    ($haystack:expr, $needle:expr, $($arg:tt)*) => {{
        let (haystack, needle) = ($haystack, $needle);
        assert!(haystack.contains(needle), $($arg)*);
    }};
}

/// Inverse of [`assert_contains!`].
#[macro_export]
macro_rules! assert_not_contains {
    ($haystack:expr, $needle:expr) => {{
        let (haystack, needle) = ($haystack, $needle);
        assert!(
            !haystack.contains(needle),
            "{:?} unexpectedly found in:\n{}",
            needle,
            haystack
        );
    }};
}

/// Assert that a `&str` parses as JSON.
#[macro_export]
macro_rules! assert_json_valid {
    ($json:expr) => {{
        let json: &str = $json;
        if let Err(e) = serde_json::from_str::<serde_json::Value>(json) {
            panic!("invalid JSON ({e}):\n{json}");
        }
    }};
}

/// Approximate `f64` equality. The default tolerance suits exact arithmetic
/// on small values; pass a third argument for jittered or large values.
#[macro_export]
macro_rules! assert_float_eq {
    ($left:expr, $right:expr) => {
        $crate::assert_float_eq!($left, $right, f64::EPSILON * 100.0)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon): (f64, f64, f64) = ($left, $right, $epsilon);
        assert!(
            (left - right).abs() < epsilon,
            "{left} != {right} (tolerance {epsilon})"
        );
    }};
}

// =============================================================================
// Tests for Test Utilities
// =============================================================================
