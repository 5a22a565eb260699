//! Shared helpers for integration tests.
//!
//! - `fixtures`: fixture loaders and mock inference service helpers
//! - `log_capture`: in-memory `tracing` capture for log assertions
//! - `logger`: structured per-test logging

pub mod fixtures;
pub mod log_capture;
pub mod logger;
