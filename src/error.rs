//! Driver error types.

use crate::config::ConfigError;
use dfarun_core::CoreError;
use thiserror::Error;

/// Errors that stop the driver before a verdict is reached.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

impl DriverError {
    /// Returns a stable error code for JSON reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            DriverError::Config(_) => "CONFIG_ERROR",
            DriverError::Core(e) => e.error_code(),
            DriverError::Json(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the offending description line for format errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            DriverError::Core(e) => e.as_format().map(|f| f.line),
            _ => None,
        }
    }
}
