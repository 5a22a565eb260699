//! trendcast - sales and project-ranking predictions
//!
//! A small prediction service: it estimates the next value of a monthly sales
//! series and a team member's next project ranking in a category. When an
//! Ollama server is reachable the estimate comes from a language model;
//! otherwise local statistics (moving average, least-squares trend, blended
//! averages) answer instead.

// Note: deny (not forbid) to allow #[allow(unsafe_code)] in test helpers for env var manipulation
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod core;
pub mod error;
pub mod server;
pub mod storage;

/// Test utilities module - included in test builds or when test-utils feature is enabled.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{ExitCode, Result, TrendcastError};

// Re-export test utilities for external test crates
#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::*;
