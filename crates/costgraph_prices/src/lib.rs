//! # costgraph_prices
//!
//! Resolves unit prices for cost components.
//!
//! A [`PriceResolver`] turns each component's filters into a [`PriceQuery`],
//! sends the distinct queries to a [`PricingSource`] with bounded
//! concurrency, and binds the first matching price back onto the component.
//! [`GraphQLPricingSource`] talks to the hosted pricing API.

pub mod error;
pub mod graphql;
pub mod query;
pub mod resolver;
pub mod source;

pub use error::{PricingError, PricingResult};
pub use graphql::{GraphQLPricingSource, DEFAULT_PRICING_API_ENDPOINT};
pub use query::PriceQuery;
pub use resolver::{PriceResolver, PricingReport, PricingWarning, ResolverOptions, DEFAULT_CONCURRENCY};
pub use source::{PriceRecord, PricingSource, ProductRecord};
