//! Error types for price resolution.

use thiserror::Error;

/// Result type alias for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Transport failures talking to the pricing source.
///
/// Pricing ambiguity is never an error; it is reported as a
/// [`PricingWarning`](crate::PricingWarning) instead.
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Invalid API key for the pricing API")]
    InvalidApiKey,

    #[error("Pricing API rate limit exceeded, try again later")]
    RateLimited,

    #[error("Pricing API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Network error contacting the pricing API: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response from the pricing API: {0}")]
    InvalidResponse(String),

    #[error("Pricing API rejected the query: {0}")]
    Query(String),

    #[error("Price resolution timed out after {0}s")]
    Timeout(u64),

    #[error("Pricing task failed: {0}")]
    Task(String),
}

impl PricingError {
    /// Whether the failure ends the whole run rather than one query.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Query(_))
    }
}
