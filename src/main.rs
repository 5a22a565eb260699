//! trendcast - sales and project-ranking predictions
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use trendcast::cli::{Cli, Commands};
use trendcast::core::logging;
use trendcast::storage::ResolvedConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging; the server logs requests at info by default
    let default_level = if matches!(cli.command, Some(Commands::Serve(_))) {
        logging::LogLevel::Info
    } else {
        logging::LogLevel::default()
    };
    let log_settings = logging::LogSettings::resolve(
        cli.log_level.as_deref(),
        cli.json_output,
        cli.verbose,
        default_level,
    );
    logging::init(&log_settings);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{}", e);
            eprintln!("Error [{}]: {e}", e.error_code());
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: Cli) -> trendcast::Result<()> {
    let Some(command) = &cli.command else {
        print_quickstart();
        return Ok(());
    };

    let serve_args = match command {
        Commands::Serve(args) => Some(args),
        _ => None,
    };
    let config = ResolvedConfig::resolve(&cli, serve_args)?;
    tracing::debug!(
        base_url = %config.ollama.base_url,
        base_url_source = %config.sources.base_url,
        model = %config.ollama.model,
        data_dir = %config.data_dir.display(),
        "Configuration resolved"
    );

    match command {
        Commands::Serve(_) => trendcast::cli::serve::execute(&config).await,
        Commands::Status => trendcast::cli::status::execute(&config).await,
        Commands::Predict(args) => trendcast::cli::predict::execute_value(args, &config).await,
        Commands::PredictSuccess(args) => {
            trendcast::cli::predict::execute_success(args, &config).await
        }
        Commands::Generate(args) => trendcast::cli::generate::execute(args, &config),
    }
}

/// Print quickstart help when no command is given.
fn print_quickstart() {
    println!(
        r"trendcast - sales and project-ranking predictions

Predicts the next value of a sales series and a team member's next project
ranking, using a local Ollama model when one is running and local
statistics otherwise.

USAGE:
    trendcast [OPTIONS] <COMMAND>

COMMANDS:
    serve            Run the prediction API server
    status           Check whether Ollama is running
    predict          Predict the next value of a sales series
    predict-success  Predict a user's next ranking in a category
    generate         Generate synthetic datasets

QUICK START:
    trendcast generate --seed 7                 # Write data.json and project-data.json
    trendcast serve --port 3000                 # Serve the API on localhost:3000
    trendcast predict-success --user 'Emma Wilson' --category Finance

For more help: trendcast --help
"
    );
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
}
