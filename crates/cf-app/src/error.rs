//! Error types for the cf-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for every frontend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {what}: {message}")]
    Parse { what: &'static str, message: String },

    #[error("Config validation failed: {0}")]
    Validation(String),

    #[error("Unsupported config version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cf-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<cf_sim::SimError> for AppError {
    fn from(err: cf_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<cf_emergency::CatalogError> for AppError {
    fn from(err: cf_emergency::CatalogError) -> Self {
        AppError::Catalog(err.to_string())
    }
}

impl From<cf_core::CfError> for AppError {
    fn from(err: cf_core::CfError) -> Self {
        AppError::Validation(err.to_string())
    }
}
