//! Fixture loaders and mock inference service helpers.
//!
//! ```rust,ignore
//! use common::fixtures::*;
//!
//! let records: Vec<PerformanceRecord> = load_fixture("project-data.json");
//! let server = MockServer::start().await;
//! mount_online(&server).await;
//! mount_stream(&server, &load_fixture_text("ollama/stream_rating.ndjson")).await;
//! let engine = engine_for(&server.uri(), Some(7));
//! ```
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::de::DeserializeOwned;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub use trendcast::core::models::{PerformanceRecord, SalesPoint, SuccessRequest};
use trendcast::core::engine::PredictionEngine;
use trendcast::core::ollama::OllamaSettings;

// =============================================================================
// Fixture Loading
// =============================================================================

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Deserialize a JSON fixture under `tests/fixtures/`.
///
/// # Panics
///
/// Panics if the file cannot be read or parsed.
pub fn load_fixture<T: DeserializeOwned>(name: &str) -> T {
    let full = fixtures_dir().join(name);
    let content = fs::read_to_string(&full)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", full.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", full.display()))
}

/// Read a fixture as text.
///
/// # Panics
///
/// Panics if the file cannot be read.
pub fn load_fixture_text(name: &str) -> String {
    let full = fixtures_dir().join(name);
    fs::read_to_string(&full)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", full.display()))
}

pub fn fixture_records() -> Vec<PerformanceRecord> {
    load_fixture("project-data.json")
}

pub fn fixture_sales() -> Vec<SalesPoint> {
    load_fixture("data.json")
}

pub fn success_request(user: &str, category: &str, force_remote: bool) -> SuccessRequest {
    SuccessRequest {
        user: user.to_string(),
        category: category.to_string(),
        records: fixture_records(),
        force_remote,
    }
}

// =============================================================================
// Inference Service
// =============================================================================

/// Settings pointing at `base_url` with short timeouts.
pub fn settings_for(base_url: &str) -> OllamaSettings {
    OllamaSettings {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        status_timeout: Duration::from_millis(500),
        ..OllamaSettings::default()
    }
}

pub fn engine_for(base_url: &str, seed: Option<u64>) -> PredictionEngine {
    PredictionEngine::new(settings_for(base_url), seed).expect("engine should build")
}

/// A loopback URL with nothing listening on it.
///
/// Binds an ephemeral port and releases it, so connections are refused.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

/// Answer the liveness probe.
pub async fn mount_online(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [{ "name": "llama2:latest" }]
        })))
        .mount(server)
        .await;
}

/// Serve `body` as the NDJSON reply to streamed generate requests.
pub async fn mount_stream(server: &MockServer, body: &str) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({ "stream": true })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/x-ndjson")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// Serve `reply` as the single-shot generate response.
pub async fn mount_reply(server: &MockServer, reply: &str) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({ "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "llama2",
            "created_at": "2024-06-01T12:00:00Z",
            "response": reply,
            "done": true
        })))
        .mount(server)
        .await;
}

/// Fail every generate request with `status`.
pub async fn mount_generate_failure(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(status).set_body_string("model not loaded"))
        .mount(server)
        .await;
}
