//! GraphQL client for the hosted pricing API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{PricingError, PricingResult};
use crate::query::PriceQuery;
use crate::source::{PricingSource, ProductRecord};

pub const DEFAULT_PRICING_API_ENDPOINT: &str = "https://pricing.api.infracost.io";

/// Pricing source backed by the pricing API's `/graphql` endpoint.
pub struct GraphQLPricingSource {
    url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    data: Option<ProductsData>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
struct ProductsData {
    #[serde(default)]
    products: Vec<ProductRecord>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

impl GraphQLPricingSource {
    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Self {
        Self {
            url: format!("{}/graphql", endpoint.trim_end_matches('/')),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for GraphQLPricingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQLPricingSource").field("url", &self.url).finish()
    }
}

#[async_trait]
impl PricingSource for GraphQLPricingSource {
    async fn query(&self, query: &PriceQuery) -> PricingResult<Vec<ProductRecord>> {
        debug!("Querying prices for {:?}", query.product_filter);

        let response = self
            .client
            .post(&self.url)
            .header("X-Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&query.to_graphql())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        if let Some(err) = status_error(status, &body) {
            return Err(err);
        }

        parse_response(&body)
    }
}

fn status_error(status: u16, body: &str) -> Option<PricingError> {
    match status {
        200..=299 => None,
        401 | 403 => Some(PricingError::InvalidApiKey),
        429 => Some(PricingError::RateLimited),
        _ => Some(PricingError::Api {
            status,
            body: body.trim().to_string(),
        }),
    }
}

/// Extract `data.products` from a GraphQL response body.
///
/// GraphQL errors in a successful response reject only this query.
fn parse_response(body: &str) -> PricingResult<Vec<ProductRecord>> {
    let response: GraphQLResponse =
        serde_json::from_str(body).map_err(|e| PricingError::InvalidResponse(e.to_string()))?;

    match response.data {
        Some(data) => Ok(data.products),
        None => {
            let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
            Err(PricingError::Query(if messages.is_empty() {
                "response has no data".to_string()
            } else {
                messages.join("; ")
            }))
        }
    }
}
