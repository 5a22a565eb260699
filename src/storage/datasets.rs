//! JSON dataset files.
//!
//! The sales series and the project records live in two plain JSON arrays.
//! Reads happen per request and never cache.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::models::{PerformanceRecord, SalesPoint};
use crate::error::{Result, TrendcastError};

/// Default file name of the sales series.
pub const SALES_FILE: &str = "data.json";
/// Default file name of the project records.
pub const PROJECTS_FILE: &str = "project-data.json";

/// Read and decode a JSON file.
///
/// # Errors
///
/// Returns `DataLoad` if the file is missing, unreadable, or does not decode.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path).await.map_err(|e| data_error(path, &e))?;
    let value = serde_json::from_slice(&bytes).map_err(|e| data_error(path, &e))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Loaded dataset");
    Ok(value)
}

/// Load the sales series.
///
/// # Errors
///
/// Returns `DataLoad` if the file is missing or is not a sales series.
pub async fn load_sales(path: &Path) -> Result<Vec<SalesPoint>> {
    read_json(path).await
}

/// Load the project records.
///
/// # Errors
///
/// Returns `DataLoad` if the file is missing or is not a record list.
pub async fn load_projects(path: &Path) -> Result<Vec<PerformanceRecord>> {
    read_json(path).await
}

/// Write a value as pretty JSON, creating parent directories.
///
/// # Errors
///
/// Returns error if the directory or file cannot be written.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)?;
    tracing::debug!(path = %path.display(), "Dataset written");
    Ok(())
}

fn data_error(path: &Path, err: &dyn std::fmt::Display) -> TrendcastError {
    TrendcastError::DataLoad {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
