//! Ranking trend estimation.
//!
//! The trend is the ordinary least-squares slope of rankings against their
//! 0-based position, measured in ranking points per project.

/// Slopes smaller than this in magnitude read as "stable".
const STABLE_THRESHOLD: f64 = 0.05;

/// Least-squares slope of `rankings` against index `0..n`.
///
/// Callers sort rankings by date ascending first. Returns 0.0 for fewer than
/// two points.
#[must_use]
#[allow(clippy::cast_precision_loss)] // project counts never exceed f64 precision
pub fn ranking_trend(rankings: &[f64]) -> f64 {
    if rankings.len() < 2 {
        return 0.0;
    }

    let n = rankings.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = rankings.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, ranking) in rankings.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator = dx.mul_add(ranking - y_mean, numerator);
        denominator = dx.mul_add(dx, denominator);
    }

    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Coarse reading of a slope for explanation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl TrendDirection {
    /// Classify a slope.
    #[must_use]
    pub fn from_slope(slope: f64) -> Self {
        if slope.abs() < STABLE_THRESHOLD {
            Self::Stable
        } else if slope > 0.0 {
            Self::Improving
        } else {
            Self::Declining
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        }
    }
}
