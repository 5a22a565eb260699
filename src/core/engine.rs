//! Prediction orchestration.
//!
//! [`PredictionEngine`] decides per request whether to ask the inference
//! service or answer locally, and packages the result. Remote failures are
//! matched explicitly: fallback-eligible failures become a local answer
//! unless the caller forced remote use, in which case they are returned.

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::heuristic::{self, MIN_TREND_POINTS, clamp_score};
use super::models::{
    PredictionMethod, PredictionStats, SalesPoint, SuccessPrediction, SuccessRequest,
    ValuePrediction,
};
use super::ollama::{OllamaClient, OllamaSettings};
use super::{extract, prompt};
use crate::error::{Result, TrendcastError};

/// Request-scoped prediction service.
///
/// Holds no mutable state; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    remote: OllamaClient,
    seed: Option<u64>,
}

impl PredictionEngine {
    /// Create an engine talking to the configured inference service.
    ///
    /// With `seed` set, every request draws jitter from a generator seeded
    /// with that value.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(settings: OllamaSettings, seed: Option<u64>) -> Result<Self> {
        Ok(Self {
            remote: OllamaClient::new(settings)?,
            seed,
        })
    }

    fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }

    /// Whether the inference service is reachable.
    pub async fn remote_status(&self) -> bool {
        self.remote.is_running().await
    }

    /// Predict the next value of a sales series.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty series. Remote failures fall back
    /// to the moving average.
    pub async fn predict_value(&self, points: &[SalesPoint]) -> Result<ValuePrediction> {
        let fallback = ValuePrediction {
            prediction: heuristic::simple_prediction(points, &mut self.rng())?,
            method: PredictionMethod::Fallback,
        };

        if !self.remote.is_running().await {
            tracing::info!(
                stage = "predict",
                method = %fallback.method,
                points = points.len(),
                "Inference service offline, using moving average"
            );
            return Ok(fallback);
        }

        match self.remote_value(points).await {
            Ok(prediction) => {
                tracing::info!(stage = "predict", method = "ollama", prediction, "Remote value prediction");
                Ok(ValuePrediction {
                    prediction,
                    method: PredictionMethod::Ollama,
                })
            }
            Err(e) if e.is_fallback_eligible() => {
                tracing::warn!(
                    stage = "predict",
                    error = %e,
                    code = e.error_code(),
                    "Remote value prediction failed, using moving average"
                );
                Ok(fallback)
            }
            Err(e) => Err(e),
        }
    }

    async fn remote_value(&self, points: &[SalesPoint]) -> Result<f64> {
        let prompt = prompt::sales_prompt(points)?;
        let reply = self.remote.generate(&prompt).await?;
        parse_leading_number(&reply)
    }

    /// Predict the next ranking for a user in a category.
    ///
    /// # Errors
    ///
    /// Returns `RemoteUnavailable` when remote use is forced and the service
    /// is down, or the remote failure itself when forced use fails.
    pub async fn predict_success(&self, request: &SuccessRequest) -> Result<SuccessPrediction> {
        let user = request.user.as_str();
        let category = request.category.as_str();
        let stats = heuristic::compute_stats(&request.records, user, category);

        let running = self.remote.is_running().await;
        let wants_remote = request.force_remote || stats.user_category_count < MIN_TREND_POINTS;
        tracing::debug!(
            user,
            category,
            running,
            wants_remote,
            force = request.force_remote,
            history = stats.user_category_count,
            "Choosing prediction path"
        );

        if running && wants_remote {
            match self.remote_success(request, &stats).await {
                Ok(prediction) => return Ok(prediction),
                Err(e) if !request.force_remote && e.is_fallback_eligible() => {
                    tracing::warn!(
                        user,
                        category,
                        stage = "remote",
                        error = %e,
                        code = e.error_code(),
                        "Remote success prediction failed, using blended fallback"
                    );
                    return Ok(self.fallback_success(request, &stats));
                }
                Err(e) => {
                    tracing::error!(
                        user,
                        category,
                        stage = "remote",
                        error = %e,
                        code = e.error_code(),
                        "Remote success prediction failed"
                    );
                    return Err(e);
                }
            }
        }

        if request.force_remote {
            tracing::error!(
                user,
                category,
                stage = "status",
                url = self.remote.base_url(),
                "Remote prediction forced but inference service is offline"
            );
            return Err(TrendcastError::RemoteUnavailable {
                url: self.remote.base_url().to_string(),
            });
        }

        tracing::info!(
            user,
            category,
            method = "trend-based",
            prediction = stats.predicted_value,
            "Local trend-based prediction"
        );
        Ok(SuccessPrediction {
            prediction: stats.predicted_value,
            historical_average: stats.user_category_average,
            method: PredictionMethod::TrendBased,
            explanation: Some(prompt::trend_explanation(user, category, &stats)),
            stats,
        })
    }

    async fn remote_success(
        &self,
        request: &SuccessRequest,
        stats: &PredictionStats,
    ) -> Result<SuccessPrediction> {
        let recent = prompt::recent_projects(&request.records, &request.user);
        let prompt = prompt::success_prompt(&request.user, &request.category, stats, &recent);
        let extraction = self.remote.generate_stream(&prompt).await?;

        let prediction = clamp_score(extraction.value);
        tracing::info!(
            user = %request.user,
            category = %request.category,
            method = "ollama",
            raw = extraction.value,
            prediction,
            "Remote success prediction"
        );
        Ok(SuccessPrediction {
            prediction,
            historical_average: stats.user_category_average,
            method: PredictionMethod::Ollama,
            explanation: Some(extraction.text.trim().to_string()),
            stats: *stats,
        })
    }

    fn fallback_success(&self, request: &SuccessRequest, stats: &PredictionStats) -> SuccessPrediction {
        SuccessPrediction {
            prediction: heuristic::blended_prediction(stats, &mut self.rng()),
            historical_average: stats.user_category_average,
            method: PredictionMethod::Fallback,
            explanation: Some(prompt::fallback_explanation(
                &request.user,
                &request.category,
                stats,
            )),
            stats: *stats,
        }
    }
}

/// Parse the number a value reply opens with.
fn parse_leading_number(reply: &str) -> Result<f64> {
    extract::leading_number(reply)
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            let preview: String = reply.chars().take(80).collect();
            TrendcastError::Extraction(format!("reply does not start with a number: {preview:?}"))
        })
}
