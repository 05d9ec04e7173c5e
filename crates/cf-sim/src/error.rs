//! Error types for simulation setup.
//!
//! Stepping the loop never fails; only invalid parameters are reported.

use thiserror::Error;

/// Errors encountered while configuring the flow loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<cf_core::CfError> for SimError {
    fn from(e: cf_core::CfError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
