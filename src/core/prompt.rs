//! Prompt and explanation text.
//!
//! Builds the natural-language prompts sent to the inference service and the
//! human-readable summaries attached to local predictions.

use std::fmt::Write as _;

use super::models::{PerformanceRecord, PredictionStats, SalesPoint};
use super::trend::TrendDirection;
use crate::error::Result;

/// How many recent projects are quoted in a success prompt.
pub const RECENT_PROJECTS: usize = 3;

/// Prompt asking for a bare next-month value.
///
/// # Errors
///
/// Returns an error if the series cannot be serialized.
pub fn sales_prompt(points: &[SalesPoint]) -> Result<String> {
    let series = serde_json::to_string(points)?;
    Ok(format!(
        "Given this monthly sales data: {series}, predict the next month's value. \
         Return only the numeric prediction."
    ))
}

/// The user's most recent projects across all categories, newest first.
#[must_use]
pub fn recent_projects<'a>(records: &'a [PerformanceRecord], user: &str) -> Vec<&'a PerformanceRecord> {
    let mut mine: Vec<&PerformanceRecord> = records.iter().filter(|r| r.user == user).collect();
    mine.sort_by(|a, b| b.date.cmp(&a.date));
    mine.truncate(RECENT_PROJECTS);
    mine
}

/// Prompt asking for a 1-5 rating followed by a short justification.
#[must_use]
pub fn success_prompt(
    user: &str,
    category: &str,
    stats: &PredictionStats,
    recent: &[&PerformanceRecord],
) -> String {
    let mut prompt = format!(
        "You are analysing project performance rankings on a scale from 1.0 (poor) to 5.0 (excellent).\n\n\
         Team member: {user}\n\
         Project category: {category}\n\n\
         Historical statistics:\n"
    );

    let _ = writeln!(
        prompt,
        "- Average ranking in {category}: {:.2} across {} project(s)",
        stats.user_category_average, stats.user_category_count
    );
    let _ = writeln!(
        prompt,
        "- Overall average ranking: {:.2} across {} project(s)",
        stats.user_overall_average, stats.user_overall_count
    );
    let _ = writeln!(
        prompt,
        "- Average ranking of all team members in {category}: {:.2} across {} project(s)",
        stats.category_average, stats.category_count
    );
    let _ = writeln!(
        prompt,
        "- Trend in {category}: {:+.2} ranking points per project ({})",
        stats.trend,
        TrendDirection::from_slope(stats.trend).as_str()
    );

    if recent.is_empty() {
        prompt.push_str("\nNo previous projects are on record for this team member.\n");
    } else {
        prompt.push_str("\nMost recent projects:\n");
        for record in recent {
            let _ = writeln!(
                prompt,
                "- {}: {} project ranked {:.1}",
                record.date.format("%Y-%m-%d"),
                record.category,
                record.ranking
            );
        }
    }

    let _ = write!(
        prompt,
        "\nPredict the ranking {user} will receive on their next {category} project. \
         Begin your answer with the numeric rating between 1.0 and 5.0, \
         then explain your reasoning in two or three sentences."
    );
    prompt
}

/// Summary attached to a trend-based prediction.
#[must_use]
pub fn trend_explanation(user: &str, category: &str, stats: &PredictionStats) -> String {
    let mut text = if stats.user_category_count == 0 {
        format!("{user} has no previous {category} projects on record.")
    } else {
        format!(
            "Based on {} previous {category} project(s), {user} has averaged {:.1}.",
            stats.user_category_count, stats.user_category_average
        )
    };

    if stats.user_category_count >= 2 {
        let _ = write!(
            text,
            " Performance in this category is {} ({:+.2} per project), \
             giving a trend-adjusted estimate of {:.1}.",
            TrendDirection::from_slope(stats.trend).as_str(),
            stats.trend,
            stats.predicted_value
        );
    }

    if stats.user_overall_count > 0 {
        let _ = write!(
            text,
            " Across all {} of their projects the average is {:.1}.",
            stats.user_overall_count, stats.user_overall_average
        );
    }
    if stats.category_count > 0 {
        let _ = write!(
            text,
            " The team-wide {category} average is {:.1} over {} project(s).",
            stats.category_average, stats.category_count
        );
    }
    text
}

/// Summary attached to a blended fallback prediction.
#[must_use]
pub fn fallback_explanation(user: &str, category: &str, stats: &PredictionStats) -> String {
    format!(
        "AI prediction unavailable; estimated from blended historical averages \
         ({user} in {category}: {:.1}, {user} overall: {:.1}, {category} overall: {:.1}).",
        stats.user_category_average, stats.user_overall_average, stats.category_average
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_contains;
    use crate::core::heuristic::compute_stats;
    use crate::test_utils::{make_test_record, make_test_sales_series};

    fn records() -> Vec<PerformanceRecord> {
        vec![
            make_test_record("Lisa Anderson", "Energy", 3.0, "2024-01-01"),
            make_test_record("Lisa Anderson", "Energy", 4.0, "2024-02-01"),
            make_test_record("Lisa Anderson", "Retail", 2.5, "2024-04-01"),
            make_test_record("Lisa Anderson", "Finance", 4.4, "2024-03-01"),
            make_test_record("Lisa Anderson", "Finance", 1.9, "2023-12-01"),
            make_test_record("James Taylor", "Energy", 5.0, "2024-05-01"),
        ]
    }

    #[test]
    fn sales_prompt_embeds_series() {
        let prompt = sales_prompt(&make_test_sales_series(&[10.5, 11.0])).unwrap();
        assert_contains!(&prompt, "\"value\":10.5");
        assert_contains!(&prompt, "Return only the numeric prediction.");
    }

    #[test]
    fn recent_projects_are_newest_first_and_capped() {
        let records = records();
        let recent = recent_projects(&records, "Lisa Anderson");
        assert_eq!(recent.len(), RECENT_PROJECTS);
        assert_eq!(recent[0].category, "Retail");
        assert_eq!(recent[1].category, "Finance");
        assert_eq!(recent[2].category, "Energy");
    }

    #[test]
    fn success_prompt_includes_stats_and_history() {
        let records = records();
        let stats = compute_stats(&records, "Lisa Anderson", "Energy");
        let recent = recent_projects(&records, "Lisa Anderson");
        let prompt = success_prompt("Lisa Anderson", "Energy", &stats, &recent);
        assert_contains!(&prompt, "Team member: Lisa Anderson");
        assert_contains!(&prompt, "Average ranking in Energy: 3.50 across 2 project(s)");
        assert_contains!(&prompt, "+1.00 ranking points per project (improving)");
        assert_contains!(&prompt, "2024-04-01: Retail project ranked 2.5");
    }

    #[test]
    fn success_prompt_without_history() {
        let stats = PredictionStats::default();
        let prompt = success_prompt("New Hire", "Energy", &stats, &[]);
        assert_contains!(&prompt, "No previous projects are on record");
    }

    #[test]
    fn trend_explanation_mentions_counts() {
        let stats = compute_stats(&records(), "Lisa Anderson", "Energy");
        let text = trend_explanation("Lisa Anderson", "Energy", &stats);
        assert_contains!(&text, "Based on 2 previous Energy project(s)");
        assert_contains!(&text, "improving");
        assert_contains!(&text, "Across all 5 of their projects");
        assert_contains!(&text, "over 3 project(s)");
    }

    #[test]
    fn trend_explanation_without_history() {
        let text = trend_explanation("New Hire", "Energy", &PredictionStats::default());
        assert_contains!(&text, "no previous Energy projects");
    }
}
