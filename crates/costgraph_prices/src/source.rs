//! The pricing source abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PricingResult;
use crate::query::PriceQuery;

/// A product matched by a price query, with its matching prices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub prices: Vec<PriceRecord>,
}

impl ProductRecord {
    pub fn with_prices(prices: Vec<PriceRecord>) -> Self {
        Self { prices }
    }
}

/// A single price in US dollars, as returned by the pricing API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(rename = "USD", default)]
    pub usd: String,
    #[serde(rename = "priceHash", default)]
    pub price_hash: String,
}

impl PriceRecord {
    pub fn new(usd: impl Into<String>, price_hash: impl Into<String>) -> Self {
        Self {
            usd: usd.into(),
            price_hash: price_hash.into(),
        }
    }
}

/// Looks up products and prices matching a query.
///
/// Implementations return `Err` only for transport failures; an empty
/// result is a valid answer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingSource: Send + Sync {
    async fn query(&self, query: &PriceQuery) -> PricingResult<Vec<ProductRecord>>;
}
