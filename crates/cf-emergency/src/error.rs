//! Error types for catalog construction.

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur when building a scenario catalog.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    /// A catalog needs at least one scenario to cycle through.
    #[error("Scenario catalog is empty")]
    Empty,

    /// Two scenarios share an identifier.
    #[error("Duplicate scenario id: {id}")]
    DuplicateId { id: String },

    /// A scenario field holds an unusable value.
    #[error("Invalid scenario {id}: {what}")]
    InvalidScenario { id: String, what: String },
}
