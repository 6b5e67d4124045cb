//! Error types for the schema module.

use thiserror::Error;

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while producing cost output.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
