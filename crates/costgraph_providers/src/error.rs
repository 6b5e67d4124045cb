//! Error types for the resource registry.

use thiserror::Error;

/// Result type alias for registry operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur during registry lookups.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Resource type not registered: {0}")]
    UnknownResourceType(String),
}
