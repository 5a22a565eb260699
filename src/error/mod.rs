//! Error types for trendcast.
//!
//! Uses `thiserror` for structured error types that map to exit codes and
//! HTTP statuses.
//!
//! ## Error Taxonomy
//!
//! Errors are categorized into five main categories:
//! - **Client**: The caller sent an incomplete or invalid request
//! - **Remote**: The inference service is down, failed, or replied with nothing usable
//! - **Configuration**: Config file parsing, validation, or missing values
//! - **Data**: Dataset files that cannot be read or decoded
//! - **Internal**: Unexpected errors, bugs, or unclassified issues
//!
//! Each error has a stable error code (e.g., `TC-R001`) for programmatic handling.
//!
//! ## Fallback
//!
//! Remote failures that happen while *attempting* an enhanced prediction are
//! usually swallowed by the prediction engine and replaced by the local
//! heuristic. [`TrendcastError::is_fallback_eligible`] is the single place
//! that decides which variants qualify.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Incomplete or invalid request from the caller.
    Client,
    /// Inference service problems (unreachable, HTTP failure, unusable reply).
    Remote,
    /// Configuration issues (parse errors, invalid values).
    Configuration,
    /// Dataset files that cannot be loaded.
    Data,
    /// Internal errors (bugs, unexpected state, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Client => "Client error",
            Self::Remote => "Remote service error",
            Self::Configuration => "Configuration error",
            Self::Data => "Data error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Client => "Q",
            Self::Remote => "R",
            Self::Configuration => "C",
            Self::Data => "D",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Missing or invalid input, bad configuration
    InvalidInput = 2,
    /// Inference service unavailable or unusable
    RemoteError = 3,
    /// Timeout
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Main error type for trendcast operations.
#[derive(Error, Debug)]
pub enum TrendcastError {
    // ==========================================================================
    // Client errors (Category: Client)
    // ==========================================================================
    /// A required request field was absent or empty.
    #[error("missing required parameter: {name}")]
    MissingParameter { name: String },

    /// The request was structurally valid but cannot be computed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // ==========================================================================
    // Remote errors (Category: Remote)
    // ==========================================================================
    /// The inference service is down while its use was required.
    #[error("inference service unavailable at {url}")]
    RemoteUnavailable { url: String },

    /// Network or HTTP failure talking to the inference service.
    #[error("inference service call failed during {stage}: {message}")]
    RemoteCall {
        stage: String,
        status_code: Option<u16>,
        message: String,
    },

    /// The inference service replied but no number could be read from it.
    #[error("no numeric prediction found: {0}")]
    Extraction(String),

    /// Request to the inference service timed out.
    #[error("inference request timeout after {0} seconds")]
    Timeout(u64),

    // ==========================================================================
    // Configuration errors (Category: Configuration)
    // ==========================================================================
    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error parsing configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    // ==========================================================================
    // Data errors (Category: Data)
    // ==========================================================================
    /// A dataset file could not be read or decoded.
    #[error("failed to load {path}: {message}")]
    DataLoad { path: String, message: String },

    // ==========================================================================
    // I/O errors (Category: Internal)
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ==========================================================================
    // Generic wrapper (Category: Internal)
    // ==========================================================================
    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrendcastError {
    /// Shorthand for a missing request field.
    #[must_use]
    pub fn missing(name: &str) -> Self {
        Self::MissingParameter {
            name: name.to_string(),
        }
    }

    /// Map a reqwest failure at a given stage to the matching variant.
    #[must_use]
    pub fn from_reqwest(stage: &str, err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout.as_secs())
        } else {
            Self::RemoteCall {
                stage: stage.to_string(),
                status_code: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }

    /// Map error to a process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::MissingParameter { .. }
            | Self::InvalidInput(_)
            | Self::Config(_)
            | Self::ConfigParse { .. }
            | Self::DataLoad { .. } => ExitCode::InvalidInput,

            Self::RemoteUnavailable { .. } | Self::RemoteCall { .. } | Self::Extraction(_) => {
                ExitCode::RemoteError
            }

            Self::Timeout(_) => ExitCode::Timeout,

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// HTTP status code used when the error reaches an API response.
    ///
    /// Client errors map to 400; everything the caller cannot fix maps to 500.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self.category() {
            ErrorCategory::Client => 400,
            _ => 500,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingParameter { .. } | Self::InvalidInput(_) => ErrorCategory::Client,

            Self::RemoteUnavailable { .. }
            | Self::RemoteCall { .. }
            | Self::Extraction(_)
            | Self::Timeout(_) => ErrorCategory::Remote,

            Self::Config(_) | Self::ConfigParse { .. } => ErrorCategory::Configuration,

            Self::DataLoad { .. } => ErrorCategory::Data,

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `TC-{category}{number}` where category is:
    /// - Q: Client request
    /// - R: Remote service
    /// - C: Configuration
    /// - D: Data
    /// - X: Internal
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } => "TC-Q001",
            Self::InvalidInput(_) => "TC-Q002",

            Self::RemoteUnavailable { .. } => "TC-R001",
            Self::RemoteCall { .. } => "TC-R002",
            Self::Extraction(_) => "TC-R003",
            Self::Timeout(_) => "TC-R004",

            Self::Config(_) => "TC-C001",
            Self::ConfigParse { .. } => "TC-C002",

            Self::DataLoad { .. } => "TC-D001",

            Self::Io(_) => "TC-X001",
            Self::Json(_) => "TC-X002",
            Self::Other(_) => "TC-X099",
        }
    }

    /// Whether a failure on the remote-enhanced path may be replaced by the
    /// local heuristic when the caller did not force remote use.
    ///
    /// `RemoteUnavailable` is excluded: it is only raised when remote use was
    /// required in the first place.
    #[must_use]
    pub const fn is_fallback_eligible(&self) -> bool {
        matches!(
            self,
            Self::RemoteCall { .. } | Self::Extraction(_) | Self::Timeout(_)
        )
    }
}

/// Result type alias for trendcast operations.
pub type Result<T> = std::result::Result<T, TrendcastError>;
