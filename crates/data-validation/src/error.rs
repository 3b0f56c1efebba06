//! Error types for the data-validation crate.

use thiserror::Error;

/// Errors that can occur during validator registration and dispatch.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Data type '{0}' is already registered")]
    DuplicateType(String),

    #[error("Unknown data type: {0}")]
    UnknownType(String),
}

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;
