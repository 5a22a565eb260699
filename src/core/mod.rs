//! Core prediction models, algorithms, and the inference client.

pub mod engine;
pub mod extract;
pub mod heuristic;
pub mod http;
pub mod logging;
pub mod models;
pub mod ollama;
pub mod prompt;
pub mod synthetic;
pub mod trend;

pub use engine::PredictionEngine;
pub use extract::{Extraction, StreamAccumulator, extract_from_chunks, first_number};
pub use heuristic::{blended_prediction, compute_stats, moving_average, simple_prediction};
pub use models::{
    PerformanceRecord, PredictionMethod, PredictionStats, SalesPoint, SuccessPrediction,
    SuccessRequest, ValuePrediction,
};
pub use ollama::{OllamaClient, OllamaSettings};
pub use trend::{TrendDirection, ranking_trend};
