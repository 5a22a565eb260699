//! Tests for the log capture helpers against real library events.

use tracing::Level;

mod common;
use common::log_capture::TestLogCapture;
use common::logger::TestLogger;

use trendcast::core::extract::extract_from_chunks;
use trendcast::assert_float_eq;

#[test]
fn captures_skipped_stream_lines() {
    let capture = TestLogCapture::start();

    let extraction = extract_from_chunks([
        "{\"response\":\"about \"}\n",
        "not json at all\n",
        "{\"response\":\"3.25\"}\n",
    ])
    .expect("number present");

    assert_float_eq!(extraction.value, 3.25);
    capture.assert_logged_at_level(Level::WARN, "Skipping malformed stream line");
    capture.assert_field_logged("line", "not json at all");
    assert_eq!(capture.count_at_level(Level::WARN), 1);
    capture.assert_no_errors();
}

#[test]
fn clean_stream_logs_no_warnings() {
    let capture = TestLogCapture::start();

    extract_from_chunks(["{\"response\":\"4\"}\n"]).expect("number present");

    capture.assert_not_logged("Skipping malformed stream line");
    assert_eq!(capture.count_at_level(Level::WARN), 0);
}

#[test]
#[should_panic(expected = "unexpected error logs")]
fn error_events_fail_no_error_assertion() {
    let capture = TestLogCapture::start();
    tracing::error!(stage = "remote", "Remote success prediction failed");
    capture.assert_no_errors();
}

#[test]
fn logger_capture_sees_structured_fields() {
    let (log, capture) = TestLogger::with_capture("logger_capture_sees_structured_fields");
    tracing::info!(user = "Emma Wilson", prediction = 4.5, "Local trend-based prediction");

    let hits = capture.matching("trend-based");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].field("user"), Some("Emma Wilson"));
    assert_eq!(hits[0].field("prediction"), Some("4.5"));
    log.finish_ok();
}
