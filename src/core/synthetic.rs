//! Synthetic demo datasets.
//!
//! Produces realistic-looking monthly sales (seasonal swing, noise, yearly
//! growth) and project rankings (each user has two areas of strength).
//! Generators take the random source as a parameter so a seed reproduces the
//! output exactly.

use std::f64::consts::PI;

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;

use super::heuristic::{MAX_SCORE, MIN_SCORE};
use super::models::{PerformanceRecord, SalesPoint};

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const CATEGORIES: [&str; 10] = [
    "Healthcare",
    "Finance",
    "Education",
    "Technology",
    "Entertainment",
    "Manufacturing",
    "Retail",
    "Transportation",
    "Energy",
    "Real Estate",
];

pub const USERS: [&str; 10] = [
    "John Smith",
    "Emma Wilson",
    "Michael Chen",
    "Sarah Davis",
    "David Brown",
    "Lisa Anderson",
    "James Taylor",
    "Maria Garcia",
    "Robert Johnson",
    "Jennifer Lee",
];

const BASE_SALES: f64 = 10_000.0;
const SEASONAL_FACTOR: f64 = 0.3;
const NOISE_FACTOR: f64 = 0.1;
const YEARLY_GROWTH: f64 = 0.05;
const FIRST_YEAR: i32 = 2023;
const LAST_YEAR: i32 = 2024;

const PRIMARY_BOOST: f64 = 1.5;
const SECONDARY_BOOST: f64 = 0.8;
const HISTORY_DAYS: i64 = 365;

/// Two years of monthly sales with a summer/winter peak.
pub fn generate_sales<R: Rng>(rng: &mut R) -> Vec<SalesPoint> {
    let mut data = Vec::with_capacity(MONTHS.len() * 2);
    for year in FIRST_YEAR..=LAST_YEAR {
        let growth = YEARLY_GROWTH.mul_add(f64::from(year - FIRST_YEAR), 1.0);
        for (index, month) in (0u32..).zip(MONTHS) {
            let seasonal = (f64::from(index + 6) * PI / 6.0).sin() * SEASONAL_FACTOR;
            let noise = rng.gen_range(-NOISE_FACTOR..NOISE_FACTOR);
            let value = BASE_SALES * (1.0 + seasonal + noise) * growth;
            data.push(SalesPoint {
                month: format!("{month} {year}"),
                value: round_to(value, 2),
            });
        }
    }
    data
}

/// Project rankings for every user in every category, sorted by date.
///
/// Dates fall within the year before `today`.
pub fn generate_projects<R: Rng>(rng: &mut R, today: NaiveDate) -> Vec<PerformanceRecord> {
    let mut data = Vec::new();

    for user in USERS {
        let primary = CATEGORIES.choose(rng).copied().unwrap_or(CATEGORIES[0]);
        let secondary = CATEGORIES.choose(rng).copied().unwrap_or(CATEGORIES[0]);

        for category in CATEGORIES {
            let mut base = rng.gen_range(2.0..5.0);
            if category == primary {
                base += PRIMARY_BOOST;
            } else if category == secondary {
                base += SECONDARY_BOOST;
            }
            let ranking = (base + rng.gen_range(-0.5..0.5)).clamp(MIN_SCORE, MAX_SCORE);
            let ranking = round_to(ranking, 1);

            let entries = rng.gen_range(2..=4);
            for _ in 0..entries {
                let date = today - Duration::days(rng.gen_range(0..HISTORY_DAYS));
                data.push(PerformanceRecord::new(user, category, ranking, date));
            }
        }
    }

    data.sort_by_key(|r| r.date);
    data
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
