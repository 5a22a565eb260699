//! Client for the Ollama inference service.
//!
//! Talks to two endpoints:
//! - `GET /api/tags` as a liveness probe
//! - `POST /api/generate` for single-shot or streamed text generation
//!
//! No retries are performed; callers decide whether to fall back.

use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::extract::{Extraction, StreamAccumulator};
use super::http::{STATUS_TIMEOUT, build_client};
use crate::error::{Result, TrendcastError};

/// Default base URL of a local Ollama install.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
/// Default model name.
pub const DEFAULT_MODEL: &str = "llama2";

/// Connection settings for the inference service.
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub status_timeout: Duration,
    pub temperature: f64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: super::http::DEFAULT_TIMEOUT,
            status_timeout: STATUS_TIMEOUT,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// HTTP client bound to one inference service and model.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    settings: OllamaSettings,
}

impl OllamaClient {
    /// Create a client from settings.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built.
    pub fn new(settings: OllamaSettings) -> Result<Self> {
        let client = build_client(settings.timeout)?;
        Ok(Self { client, settings })
    }

    /// Base URL of the service.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    /// Model used for generation.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.settings.base_url.trim_end_matches('/'))
    }

    /// Whether the service answers its tags endpoint with a success status.
    ///
    /// Every failure, including timeouts, reads as "not running".
    pub async fn is_running(&self) -> bool {
        let url = self.endpoint("/api/tags");
        match self
            .client
            .get(&url)
            .timeout(self.settings.status_timeout)
            .send()
            .await
        {
            Ok(response) => {
                let ok = response.status().is_success();
                tracing::debug!(%url, status = %response.status(), running = ok, "Inference service probe");
                ok
            }
            Err(e) => {
                tracing::debug!(%url, error = %e, "Inference service probe failed");
                false
            }
        }
    }

    /// Run a non-streamed generation and return the response text.
    ///
    /// # Errors
    ///
    /// Returns `RemoteCall` on network or HTTP failure, `Timeout` if the
    /// request exceeds the configured timeout.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self.send_generate(prompt, false).await?;
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TrendcastError::from_reqwest("generate", &e, self.settings.timeout))?;
        Ok(body.response)
    }

    /// Run a streamed generation and extract the first number from the
    /// accumulated output.
    ///
    /// # Errors
    ///
    /// Returns `RemoteCall`/`Timeout` on transport failure mid-stream and
    /// `Extraction` if the full output holds no number.
    pub async fn generate_stream(&self, prompt: &str) -> Result<Extraction> {
        let response = self.send_generate(prompt, true).await?;

        let mut accumulator = StreamAccumulator::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| TrendcastError::from_reqwest("stream", &e, self.settings.timeout))?;
            accumulator.push_chunk(&chunk);
        }

        tracing::debug!(
            lines = accumulator.lines_parsed(),
            skipped = accumulator.lines_skipped(),
            chars = accumulator.text().len(),
            "Generate stream finished"
        );
        accumulator.finish()
    }

    async fn send_generate(&self, prompt: &str, stream: bool) -> Result<reqwest::Response> {
        let url = self.endpoint("/api/generate");
        let request = GenerateRequest {
            model: &self.settings.model,
            prompt,
            stream,
            options: GenerateOptions {
                temperature: self.settings.temperature,
            },
        };

        tracing::debug!(%url, model = %self.settings.model, stream, "Sending generate request");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TrendcastError::from_reqwest("generate", &e, self.settings.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrendcastError::RemoteCall {
                stage: "generate".to_string(),
                status_code: Some(status.as_u16()),
                message: format!("HTTP {status} from {url}"),
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = OllamaClient::new(OllamaSettings {
            base_url: "http://localhost:11434/".to_string(),
            ..OllamaSettings::default()
        })
        .unwrap();
        assert_eq!(
            client.endpoint("/api/tags"),
            "http://localhost:11434/api/tags"
        );
    }

    #[test]
    fn generate_request_shape() {
        let request = GenerateRequest {
            model: "llama2",
            prompt: "hi",
            stream: true,
            options: GenerateOptions { temperature: 0.5 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama2");
        assert_eq!(json["stream"], true);
        assert_eq!(json["options"]["temperature"], 0.5);
    }
}
