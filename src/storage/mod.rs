//! Storage for configuration and dataset files.

pub mod config;
pub mod datasets;
pub mod paths;

pub use config::{
    Config, ConfigSource, ConfigSources, ResolvedConfig, ENV_CONFIG, ENV_DATA_DIR, ENV_HOST,
    ENV_MODEL, ENV_OLLAMA_URL, ENV_PORT, ENV_PRETTY, ENV_SEED, ENV_TIMEOUT,
};
pub use datasets::{PROJECTS_FILE, SALES_FILE, load_projects, load_sales, read_json, write_json};
pub use paths::AppPaths;
