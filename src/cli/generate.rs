//! Generate command implementation.

use std::path::PathBuf;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::cli::args::GenerateArgs;
use crate::cli::print_json;
use crate::core::synthetic::{generate_projects, generate_sales};
use crate::error::Result;
use crate::storage::{ResolvedConfig, write_json};

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    sales_file: Option<PathBuf>,
    sales_points: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    projects_file: Option<PathBuf>,
    project_records: usize,
}

/// Execute the generate command.
///
/// # Errors
///
/// Returns `Io` if a dataset file cannot be written.
pub fn execute(args: &GenerateArgs, config: &ResolvedConfig) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let output = generate_into(args, config, today)?;

    if config.json {
        return print_json(&output, config.pretty);
    }
    if let Some(path) = &output.sales_file {
        println!("Generated {} sales points in {}", output.sales_points, path.display());
    }
    if let Some(path) = &output.projects_file {
        println!(
            "Generated {} project records in {}",
            output.project_records,
            path.display()
        );
    }
    Ok(())
}

const SALES_STREAM: u64 = 0;
const PROJECTS_STREAM: u64 = 1;

/// Each dataset draws from its own stream so a seed reproduces it whether
/// or not the other dataset is generated alongside.
fn dataset_rng(seed: Option<u64>, stream: u64) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, |seed| {
        StdRng::seed_from_u64(seed.wrapping_add(stream))
    })
}

fn generate_into(
    args: &GenerateArgs,
    config: &ResolvedConfig,
    today: NaiveDate,
) -> Result<GenerateOutput> {
    let out_dir = args.out_dir.as_deref().unwrap_or(config.data_dir.as_path());
    let mut output = GenerateOutput::default();

    if !args.projects_only {
        let sales = generate_sales(&mut dataset_rng(config.seed, SALES_STREAM));
        let path = out_dir.join(&config.sales_file);
        write_json(&path, &sales)?;
        tracing::info!(path = %path.display(), points = sales.len(), "Sales data generated");
        output.sales_points = sales.len();
        output.sales_file = Some(path);
    }

    if !args.sales_only {
        let projects = generate_projects(&mut dataset_rng(config.seed, PROJECTS_STREAM), today);
        let path = out_dir.join(&config.projects_file);
        write_json(&path, &projects)?;
        tracing::info!(path = %path.display(), records = projects.len(), "Project data generated");
        output.project_records = projects.len();
        output.projects_file = Some(path);
    }

    Ok(output)
}
