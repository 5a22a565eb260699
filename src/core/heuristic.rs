//! Local, non-AI prediction heuristics.
//!
//! Everything here is a pure function of its inputs. Randomness comes from
//! the caller-supplied [`Rng`], so a seeded generator gives repeatable
//! results.

use rand::Rng;

use super::models::{PerformanceRecord, PredictionStats, SalesPoint};
use super::trend::ranking_trend;
use crate::error::{Result, TrendcastError};

/// Lowest score on the ranking scale.
pub const MIN_SCORE: f64 = 1.0;
/// Highest score on the ranking scale.
pub const MAX_SCORE: f64 = 5.0;
/// Score used when no history exists at all.
pub const DEFAULT_SCORE: f64 = 3.0;
/// Half-width of the multiplicative jitter band.
pub const JITTER: f64 = 0.05;
/// Number of trailing sales points in the moving average.
pub const MOVING_AVERAGE_WINDOW: usize = 3;
/// Minimum user×category history before the trend is applied.
pub const MIN_TREND_POINTS: usize = 2;

const USER_CATEGORY_WEIGHT: f64 = 0.5;
const USER_OVERALL_WEIGHT: f64 = 0.3;
const CATEGORY_WEIGHT: f64 = 0.2;
/// Projects ahead the trend is projected when adjusting the average.
const TREND_HORIZON: f64 = 2.0;

/// Clamp a score to the ranking scale.
#[must_use]
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(MIN_SCORE, MAX_SCORE)
}

/// Gather per-user and per-category statistics from the full record set.
#[must_use]
pub fn compute_stats(
    records: &[PerformanceRecord],
    user: &str,
    category: &str,
) -> PredictionStats {
    let mut user_category: Vec<&PerformanceRecord> = records
        .iter()
        .filter(|r| r.user == user && r.category == category)
        .collect();
    user_category.sort_by_key(|r| r.date);

    let (user_category_average, user_category_count) =
        mean(user_category.iter().map(|r| r.ranking));
    let (user_overall_average, user_overall_count) =
        mean(records.iter().filter(|r| r.user == user).map(|r| r.ranking));
    let (category_average, category_count) = mean(
        records
            .iter()
            .filter(|r| r.category == category)
            .map(|r| r.ranking),
    );

    let (trend, predicted_value) = if user_category_count >= MIN_TREND_POINTS {
        let rankings: Vec<f64> = user_category.iter().map(|r| r.ranking).collect();
        let trend = ranking_trend(&rankings);
        (
            trend,
            clamp_score(TREND_HORIZON.mul_add(trend, user_category_average)),
        )
    } else {
        (0.0, user_category_average)
    };

    PredictionStats {
        user_category_average,
        user_overall_average,
        category_average,
        trend,
        predicted_value,
        user_category_count,
        user_overall_count,
        category_count,
    }
}

/// Weighted blend of the three averages, before jitter.
///
/// Falls back to [`DEFAULT_SCORE`] when every average is zero.
#[must_use]
pub fn blend(stats: &PredictionStats) -> f64 {
    if stats.user_category_average == 0.0
        && stats.user_overall_average == 0.0
        && stats.category_average == 0.0
    {
        return DEFAULT_SCORE;
    }

    CATEGORY_WEIGHT.mul_add(
        stats.category_average,
        USER_CATEGORY_WEIGHT.mul_add(
            stats.user_category_average,
            USER_OVERALL_WEIGHT * stats.user_overall_average,
        ),
    )
}

/// Scale `value` by `1 + U` with `U` uniform in `[-JITTER, JITTER]`.
pub fn apply_jitter<R: Rng>(value: f64, rng: &mut R) -> f64 {
    value * (1.0 + rng.gen_range(-JITTER..=JITTER))
}

/// The fallback success score: blended, jittered, clamped.
pub fn blended_prediction<R: Rng>(stats: &PredictionStats, rng: &mut R) -> f64 {
    clamp_score(apply_jitter(blend(stats), rng))
}

/// Mean of the last [`MOVING_AVERAGE_WINDOW`] values, or of all values when
/// fewer exist.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty series.
#[allow(clippy::cast_precision_loss)] // window is at most 3
pub fn moving_average(points: &[SalesPoint]) -> Result<f64> {
    if points.is_empty() {
        return Err(TrendcastError::InvalidInput(
            "cannot predict from an empty series".to_string(),
        ));
    }

    let tail = &points[points.len().saturating_sub(MOVING_AVERAGE_WINDOW)..];
    let sum: f64 = tail.iter().map(|p| p.value).sum();
    Ok(sum / tail.len() as f64)
}

/// The fallback value prediction: jittered moving average.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty series.
pub fn simple_prediction<R: Rng>(points: &[SalesPoint], rng: &mut R) -> Result<f64> {
    moving_average(points).map(|avg| apply_jitter(avg, rng))
}

#[allow(clippy::cast_precision_loss)] // record counts never exceed f64 precision
fn mean(values: impl Iterator<Item = f64>) -> (f64, usize) {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        (0.0, 0)
    } else {
        (sum / count as f64, count)
    }
}
