//! Platform location of the config file.

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};

/// Per-user application directories.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config: PathBuf,
}

impl AppPaths {
    /// Platform config directory, or `~/.config/trendcast` when the platform
    /// has none.
    #[must_use]
    pub fn new() -> Self {
        let config = ProjectDirs::from("dev", "trendcast", "trendcast").map_or_else(
            || {
                BaseDirs::new()
                    .map_or_else(|| PathBuf::from("."), |d| d.home_dir().to_path_buf())
                    .join(".config/trendcast")
            },
            |dirs| dirs.config_dir().to_path_buf(),
        );
        Self { config }
    }

    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.toml")
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
