//! Core data models.
//!
//! These types are the wire shapes shared by the HTTP API, the CLI, and the
//! dataset files. Field names serialize camelCase to match the JSON stores.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrendcastError};

// =============================================================================
// Source Records
// =============================================================================

/// One ranked project outcome for a user in a category.
///
/// Rankings are on a 1.0 to 5.0 scale. Dates serialize as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceRecord {
    pub user: String,
    pub category: String,
    pub ranking: f64,
    pub date: NaiveDate,
}

impl PerformanceRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(user: &str, category: &str, ranking: f64, date: NaiveDate) -> Self {
        Self {
            user: user.to_string(),
            category: category.to_string(),
            ranking,
            date,
        }
    }
}

/// One monthly sales value, e.g. `{ "month": "Jan 2024", "value": 10234.5 }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesPoint {
    pub month: String,
    pub value: f64,
}

// =============================================================================
// Derived Statistics
// =============================================================================

/// Per-request statistics for one user in one category.
///
/// Recomputed from the full record collection on every request; never cached.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionStats {
    /// Mean ranking of the user within the category (0 when empty).
    pub user_category_average: f64,
    /// Mean ranking of the user across all categories (0 when empty).
    pub user_overall_average: f64,
    /// Mean ranking of everyone within the category (0 when empty).
    pub category_average: f64,
    /// Least-squares slope over the user's category history, by date.
    pub trend: f64,
    /// Trend-adjusted estimate used by the local trend-based method.
    pub predicted_value: f64,
    pub user_category_count: usize,
    pub user_overall_count: usize,
    pub category_count: usize,
}

// =============================================================================
// Prediction Results
// =============================================================================

/// How a prediction was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictionMethod {
    /// Produced by the remote inference service.
    Ollama,
    /// Local blended heuristic, used when the remote path was unavailable or failed.
    Fallback,
    /// Local trend-adjusted average.
    TrendBased,
}

impl PredictionMethod {
    /// Wire label for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Fallback => "fallback",
            Self::TrendBased => "trend-based",
        }
    }
}

impl std::fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the simple time-series prediction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuePrediction {
    pub prediction: f64,
    pub method: PredictionMethod,
}

/// Result of a success-score prediction for a user in a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuccessPrediction {
    pub prediction: f64,
    pub historical_average: f64,
    pub method: PredictionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub stats: PredictionStats,
}

/// A validated success-score request.
#[derive(Debug, Clone)]
pub struct SuccessRequest {
    pub user: String,
    pub category: String,
    pub records: Vec<PerformanceRecord>,
    pub force_remote: bool,
}

impl SuccessRequest {
    /// Validate raw request fields.
    ///
    /// Empty or whitespace-only names count as missing. An empty record list
    /// is allowed and simply yields empty statistics.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` naming the first absent field.
    pub fn from_parts(
        user: Option<String>,
        category: Option<String>,
        records: Option<Vec<PerformanceRecord>>,
        force_remote: bool,
    ) -> Result<Self> {
        let user = non_blank(user).ok_or_else(|| TrendcastError::missing("user"))?;
        let category = non_blank(category).ok_or_else(|| TrendcastError::missing("category"))?;
        let records = records.ok_or_else(|| TrendcastError::missing("data"))?;
        Ok(Self {
            user,
            category,
            records,
            force_remote,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_date_serializes_as_plain_date() {
        let record = PerformanceRecord::new(
            "Emma Wilson",
            "Finance",
            4.2,
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2024-03-09");
        assert_eq!(json["user"], "Emma Wilson");
    }

    #[test]
    fn success_request_requires_all_fields() {
        let err = SuccessRequest::from_parts(None, Some("Finance".into()), Some(vec![]), false)
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required parameter: user");

        let err = SuccessRequest::from_parts(Some("A".into()), Some("  ".into()), Some(vec![]), false)
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required parameter: category");

        let err =
            SuccessRequest::from_parts(Some("A".into()), Some("Finance".into()), None, true)
                .unwrap_err();
        assert!(matches!(err, TrendcastError::MissingParameter { ref name } if name == "data"));

        let ok = SuccessRequest::from_parts(Some("A".into()), Some("Finance".into()), Some(vec![]), true)
            .unwrap();
        assert!(ok.force_remote);
        assert!(ok.records.is_empty());
    }

    #[test]
    fn method_labels_match_wire_format() {
        assert_eq!(
            serde_json::to_string(&PredictionMethod::TrendBased).unwrap(),
            "\"trend-based\""
        );
        assert_eq!(
            serde_json::to_string(&PredictionMethod::Ollama).unwrap(),
            "\"ollama\""
        );
        assert_eq!(PredictionMethod::Fallback.to_string(), "fallback");
    }

    #[test]
    fn success_prediction_uses_camel_case() {
        let prediction = SuccessPrediction {
            prediction: 4.0,
            historical_average: 3.5,
            method: PredictionMethod::TrendBased,
            explanation: None,
            stats: PredictionStats::default(),
        };
        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["historicalAverage"], 3.5);
        assert!(json.get("explanation").is_none());
        assert_eq!(json["stats"]["userCategoryAverage"], 0.0);
        assert_eq!(json["stats"]["predictedValue"], 0.0);
    }
}
