//! Prediction commands over dataset files.

use crate::cli::args::{PredictArgs, PredictSuccessArgs};
use crate::cli::print_json;
use crate::core::engine::PredictionEngine;
use crate::core::models::{SuccessPrediction, SuccessRequest, ValuePrediction};
use crate::core::trend::TrendDirection;
use crate::error::Result;
use crate::storage::{ResolvedConfig, load_projects, load_sales};

/// Execute the predict command.
///
/// # Errors
///
/// Returns `DataLoad` for an unreadable sales file and `InvalidInput` for an
/// empty series.
pub async fn execute_value(args: &PredictArgs, config: &ResolvedConfig) -> Result<()> {
    let path = args.data_file.clone().unwrap_or_else(|| config.sales_path());
    let points = load_sales(&path).await?;

    let engine = PredictionEngine::new(config.ollama.clone(), config.seed)?;
    let prediction = engine.predict_value(&points).await?;

    if config.json {
        return print_json(&prediction, config.pretty);
    }
    println!("{}", render_value(&prediction, points.len()));
    Ok(())
}

/// Execute the predict-success command.
///
/// # Errors
///
/// Returns `DataLoad` for an unreadable project file, `MissingParameter` for a
/// blank user or category, or the remote failure when `--force-ai` is set.
pub async fn execute_success(args: &PredictSuccessArgs, config: &ResolvedConfig) -> Result<()> {
    let path = args.data_file.clone().unwrap_or_else(|| config.projects_path());
    let records = load_projects(&path).await?;

    let request = SuccessRequest::from_parts(
        Some(args.user.clone()),
        Some(args.category.clone()),
        Some(records),
        args.force_ai,
    )?;

    let engine = PredictionEngine::new(config.ollama.clone(), config.seed)?;
    let prediction = engine.predict_success(&request).await?;

    if config.json {
        return print_json(&prediction, config.pretty);
    }
    println!("{}", render_success(&request, &prediction));
    Ok(())
}

fn render_value(prediction: &ValuePrediction, points: usize) -> String {
    format!(
        "Next value: {:.2} ({}, from {points} points)",
        prediction.prediction, prediction.method
    )
}

fn render_success(request: &SuccessRequest, prediction: &SuccessPrediction) -> String {
    let stats = &prediction.stats;
    let mut out = format!(
        "{} / {}: predicted ranking {:.2} ({})\n",
        request.user, request.category, prediction.prediction, prediction.method
    );
    out.push_str(&format!(
        "  history: {} in category (avg {:.2}), {} overall (avg {:.2})\n",
        stats.user_category_count,
        stats.user_category_average,
        stats.user_overall_count,
        stats.user_overall_average,
    ));
    out.push_str(&format!(
        "  category average {:.2}, trend {:+.3} ({})",
        stats.category_average,
        stats.trend,
        TrendDirection::from_slope(stats.trend).as_str(),
    ));
    if let Some(explanation) = &prediction.explanation {
        out.push_str("\n\n");
        out.push_str(explanation);
    }
    out
}
