//! Configuration file loading and management.
//!
//! Loads configuration from:
//! - Linux: `~/.config/trendcast/config.toml`
//! - macOS: `~/Library/Application Support/dev.trendcast.trendcast/config.toml`
//! - Windows: `%APPDATA%/trendcast/config/config.toml`
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `TRENDCAST_CONFIG`: Override config file path
//! - `TRENDCAST_HOST` / `TRENDCAST_PORT`: Server bind address
//! - `TRENDCAST_OLLAMA_URL`: Inference service base URL
//! - `TRENDCAST_MODEL`: Model name
//! - `TRENDCAST_TIMEOUT`: Inference timeout in seconds
//! - `TRENDCAST_DATA_DIR`: Directory holding the dataset files
//! - `TRENDCAST_SEED`: Fixed seed for prediction jitter
//! - `TRENDCAST_PRETTY`: Pretty-print JSON output (1, true, yes)

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AppPaths;
use super::datasets::{PROJECTS_FILE, SALES_FILE};
use crate::cli::args::{Cli, ServeArgs};
use crate::core::ollama::{DEFAULT_BASE_URL, DEFAULT_MODEL, OllamaSettings};
use crate::error::{Result, TrendcastError};

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "TRENDCAST_CONFIG";
/// Environment variable for the server bind host.
pub const ENV_HOST: &str = "TRENDCAST_HOST";
/// Environment variable for the server port.
pub const ENV_PORT: &str = "TRENDCAST_PORT";
/// Environment variable for the inference service URL.
pub const ENV_OLLAMA_URL: &str = "TRENDCAST_OLLAMA_URL";
/// Environment variable for the model name.
pub const ENV_MODEL: &str = "TRENDCAST_MODEL";
/// Environment variable for the inference timeout in seconds.
pub const ENV_TIMEOUT: &str = "TRENDCAST_TIMEOUT";
/// Environment variable for the dataset directory.
pub const ENV_DATA_DIR: &str = "TRENDCAST_DATA_DIR";
/// Environment variable for the jitter seed.
pub const ENV_SEED: &str = "TRENDCAST_SEED";
/// Environment variable for pretty JSON output.
pub const ENV_PRETTY: &str = "TRENDCAST_PRETTY";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_STATUS_TIMEOUT_SECS: u64 = 60;
const MAX_TEMPERATURE: f64 = 2.0;

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Server bind host.
    pub host: String,
    /// Server port. Zero picks an ephemeral port.
    pub port: u16,
    /// Inference service connection settings.
    pub ollama: OllamaSettings,
    /// Directory holding the dataset files.
    pub data_dir: PathBuf,
    /// Sales series file name, relative to `data_dir` unless absolute.
    pub sales_file: PathBuf,
    /// Project records file name, relative to `data_dir` unless absolute.
    pub projects_file: PathBuf,
    /// Fixed seed for jitter and data generation.
    pub seed: Option<u64>,
    /// Whether to print results as JSON.
    pub json: bool,
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub host: ConfigSource,
    pub port: ConfigSource,
    pub base_url: ConfigSource,
    pub model: ConfigSource,
    pub timeout: ConfigSource,
    pub data_dir: ConfigSource,
    pub seed: ConfigSource,
    pub pretty: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl ResolvedConfig {
    /// Resolve final configuration from CLI args, environment variables, and config file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but is invalid
    /// - An environment variable holds an unparseable value
    /// - Any resolved value fails validation
    pub fn resolve(cli: &Cli, serve: Option<&ServeArgs>) -> Result<Self> {
        let config = Self::load_config(cli)?;
        config.validate()?;

        let mut sources = ConfigSources::default();

        let host = layered(
            serve.and_then(|s| s.host.clone()),
            env_value(ENV_HOST),
            config.server.host.clone(),
            DEFAULT_HOST.to_string(),
            &mut sources.host,
        );
        let port = layered(
            serve.and_then(|s| s.port),
            env_parsed(ENV_PORT)?,
            config.server.port,
            DEFAULT_PORT,
            &mut sources.port,
        );
        let base_url = layered(
            cli.ollama_url.clone(),
            env_value(ENV_OLLAMA_URL),
            config.remote.base_url.clone(),
            DEFAULT_BASE_URL.to_string(),
            &mut sources.base_url,
        );
        let model = layered(
            cli.model.clone(),
            env_value(ENV_MODEL),
            config.remote.model.clone(),
            DEFAULT_MODEL.to_string(),
            &mut sources.model,
        );
        let timeout_secs = layered(
            cli.timeout,
            env_parsed(ENV_TIMEOUT)?,
            config.remote.timeout_seconds,
            RemoteConfig::default().timeout_seconds,
            &mut sources.timeout,
        );
        let data_dir = layered(
            cli.data_dir.clone(),
            env_value(ENV_DATA_DIR).map(PathBuf::from),
            config.data.dir.clone().unwrap_or_else(default_data_dir),
            default_data_dir(),
            &mut sources.data_dir,
        );
        let seed = layered(
            cli.seed.map(Some),
            env_parsed(ENV_SEED)?.map(Some),
            config.prediction.seed,
            None,
            &mut sources.seed,
        );
        let pretty = Self::resolve_pretty(cli, &config, &mut sources.pretty);

        validate_remote(&base_url, &model, timeout_secs, config.remote.temperature)?;

        Ok(Self {
            host,
            port,
            ollama: OllamaSettings {
                base_url,
                model,
                timeout: Duration::from_secs(timeout_secs),
                status_timeout: Duration::from_secs(config.remote.status_timeout_seconds),
                temperature: config.remote.temperature,
            },
            data_dir,
            sales_file: PathBuf::from(&config.data.sales_file),
            projects_file: PathBuf::from(&config.data.projects_file),
            seed,
            json: cli.json,
            pretty,
            sources,
        })
    }

    /// Load config file, respecting `--config` and `TRENDCAST_CONFIG`.
    fn load_config(cli: &Cli) -> Result<Config> {
        if let Some(path) = &cli.config {
            Config::load_from(path)
        } else if let Some(path) = env_value(ENV_CONFIG) {
            Config::load_from(Path::new(&path))
        } else {
            Config::load()
        }
    }

    /// Resolve pretty setting.
    fn resolve_pretty(cli: &Cli, config: &Config, source: &mut ConfigSource) -> bool {
        if cli.pretty {
            *source = ConfigSource::Cli;
            return true;
        }

        if Self::is_env_truthy(ENV_PRETTY) {
            *source = ConfigSource::Env;
            return true;
        }

        if config.output.pretty {
            *source = ConfigSource::ConfigFile;
            return true;
        }

        *source = ConfigSource::Default;
        false
    }

    /// Check if an environment variable is set to a truthy value.
    fn is_env_truthy(var: &str) -> bool {
        std::env::var(var)
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false)
    }

    /// Full path of the sales series file.
    #[must_use]
    pub fn sales_path(&self) -> PathBuf {
        self.data_dir.join(&self.sales_file)
    }

    /// Full path of the project records file.
    #[must_use]
    pub fn projects_path(&self) -> PathBuf {
        self.data_dir.join(&self.projects_file)
    }

    /// `host:port` string for binding the server.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Pick the highest-precedence value and record where it came from.
///
/// A file value equal to the default counts as the default.
fn layered<T: PartialEq>(
    cli: Option<T>,
    env: Option<T>,
    file: T,
    default: T,
    source: &mut ConfigSource,
) -> T {
    if let Some(value) = cli {
        *source = ConfigSource::Cli;
        return value;
    }
    if let Some(value) = env {
        *source = ConfigSource::Env;
        return value;
    }
    if file != default {
        *source = ConfigSource::ConfigFile;
        return file;
    }
    *source = ConfigSource::Default;
    default
}

fn env_value(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parsed<T>(var: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    env_value(var)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| TrendcastError::Config(format!("Invalid {var} value \"{raw}\": {e}")))
        })
        .transpose()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Check the inference settings that every layer can override.
fn validate_remote(base_url: &str, model: &str, timeout_secs: u64, temperature: f64) -> Result<()> {
    let url = reqwest::Url::parse(base_url)
        .map_err(|e| TrendcastError::Config(format!("Invalid base URL \"{base_url}\": {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TrendcastError::Config(format!(
            "Base URL must use http or https, got \"{}\"",
            url.scheme()
        )));
    }

    if model.trim().is_empty() {
        return Err(TrendcastError::Config("Model name must not be empty".to_string()));
    }

    if timeout_secs == 0 || timeout_secs > MAX_TIMEOUT_SECS {
        return Err(TrendcastError::Config(format!(
            "Timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds"
        )));
    }

    if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(TrendcastError::Config(format!(
            "Temperature must be between 0 and {MAX_TEMPERATURE}"
        )));
    }

    Ok(())
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Inference service settings.
    pub remote: RemoteConfig,
    /// Dataset locations.
    pub data: DataConfig,
    /// Prediction settings.
    pub prediction: PredictionConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Inference service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the Ollama service.
    pub base_url: String,
    /// Model used for generation.
    pub model: String,
    /// Timeout for generate requests in seconds.
    pub timeout_seconds: u64,
    /// Timeout for the liveness probe in seconds.
    pub status_timeout_seconds: u64,
    /// Sampling temperature sent with every generate request.
    pub temperature: f64,
}

/// Dataset locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the dataset files (current directory when unset).
    pub dir: Option<PathBuf>,
    pub sales_file: String,
    pub projects_file: String,
}

/// Prediction settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Fixed seed for jitter; random per request when unset.
    pub seed: Option<u64>,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let settings = OllamaSettings::default();
        Self {
            base_url: settings.base_url,
            model: settings.model,
            timeout_seconds: settings.timeout.as_secs(),
            status_timeout_seconds: settings.status_timeout.as_secs(),
            temperature: settings.temperature,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: None,
            sales_file: SALES_FILE.to_string(),
            projects_file: PROJECTS_FILE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file path.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `ConfigParse` if it is not
    /// valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| TrendcastError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        AppPaths::new().config_file()
    }

    /// Validate configuration values.
    ///
    /// Checks that:
    /// - The base URL parses and uses http or https
    /// - The model name is not empty
    /// - Timeouts are within bounds (1-300 seconds, probe 1-60 seconds)
    /// - Temperature is within 0-2
    ///
    /// # Errors
    ///
    /// Returns `Config` naming the first value out of bounds.
    pub fn validate(&self) -> Result<()> {
        validate_remote(
            &self.remote.base_url,
            &self.remote.model,
            self.remote.timeout_seconds,
            self.remote.temperature,
        )?;

        if self.remote.status_timeout_seconds == 0
            || self.remote.status_timeout_seconds > MAX_STATUS_TIMEOUT_SECS
        {
            return Err(TrendcastError::Config(format!(
                "Status timeout must be between 1 and {MAX_STATUS_TIMEOUT_SECS} seconds"
            )));
        }

        if self.data.sales_file.trim().is_empty() || self.data.projects_file.trim().is_empty() {
            return Err(TrendcastError::Config(
                "Dataset file names must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
