//! HTTP client utilities.
//!
//! Provides the configured HTTP client used to reach the inference service.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::error::{Result, TrendcastError};

/// Default timeout for inference requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for liveness probes.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(2);

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("trendcast/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| TrendcastError::Config(format!("failed to build HTTP client: {e}")))
}
