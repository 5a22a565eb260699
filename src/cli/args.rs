//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Trendcast - sales and project-ranking predictions with optional Ollama enhancement.
#[derive(Parser, Debug)]
#[command(name = "trendcast")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Global flags ===
    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    // === Inference service ===
    /// Base URL of the Ollama service
    #[arg(long, value_name = "URL", global = true)]
    pub ollama_url: Option<String>,

    /// Model used for generation
    #[arg(long, value_name = "MODEL", global = true)]
    pub model: Option<String>,

    /// Inference request timeout in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    // === Data ===
    /// Directory holding data.json and project-data.json
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Seed for prediction jitter and data generation
    #[arg(long, value_name = "N", global = true)]
    pub seed: Option<u64>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the prediction API server
    Serve(ServeArgs),

    /// Check whether the inference service is running
    Status,

    /// Predict the next value of a sales series
    Predict(PredictArgs),

    /// Predict a user's next project ranking in a category
    PredictSuccess(PredictSuccessArgs),

    /// Generate synthetic sales and project datasets
    Generate(GenerateArgs),
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p', value_name = "PORT")]
    pub port: Option<u16>,
}

/// Arguments for the `predict` command.
#[derive(Parser, Debug)]
pub struct PredictArgs {
    /// Sales series file (defaults to data.json in the data directory)
    #[arg(long, value_name = "PATH")]
    pub data_file: Option<PathBuf>,
}

/// Arguments for the `predict-success` command.
#[derive(Parser, Debug)]
pub struct PredictSuccessArgs {
    /// Team member to predict for
    #[arg(long)]
    pub user: String,

    /// Project category
    #[arg(long)]
    pub category: String,

    /// Project records file (defaults to project-data.json in the data directory)
    #[arg(long, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Require the inference service instead of falling back locally
    #[arg(long)]
    pub force_ai: bool,
}

/// Arguments for the `generate` command.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Output directory (defaults to the data directory)
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Only generate the sales series
    #[arg(long, conflicts_with = "projects_only")]
    pub sales_only: bool,

    /// Only generate the project rankings
    #[arg(long)]
    pub projects_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_predict_success() {
        let cli = Cli::parse_from([
            "trendcast",
            "predict-success",
            "--user",
            "Emma Wilson",
            "--category",
            "Finance",
            "--force-ai",
            "--seed",
            "4",
        ]);
        assert_eq!(cli.seed, Some(4));
        match cli.command {
            Some(Commands::PredictSuccess(args)) => {
                assert_eq!(args.user, "Emma Wilson");
                assert!(args.force_ai);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_serve_with_global_flags() {
        let cli = Cli::parse_from([
            "trendcast",
            "serve",
            "--port",
            "8080",
            "--ollama-url",
            "http://gpu-box:11434",
        ]);
        assert_eq!(cli.ollama_url.as_deref(), Some("http://gpu-box:11434"));
        assert!(matches!(
            cli.command,
            Some(Commands::Serve(ServeArgs { port: Some(8080), .. }))
        ));
    }
}
