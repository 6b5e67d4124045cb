//! Binds prices to the cost components of a resource forest.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use costgraph_schema::{CostComponent, Resource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{PricingError, PricingResult};
use crate::query::PriceQuery;
use crate::source::{PricingSource, ProductRecord};

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Resolver tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Maximum number of queries in flight.
    pub concurrency: usize,
    /// Deadline for resolving the whole forest.
    pub timeout: Option<Duration>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: None,
        }
    }
}

impl ResolverOptions {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A non-fatal pricing problem for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingWarning {
    pub resource: String,
    pub component: String,
    pub message: String,
}

impl fmt::Display for PricingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.resource, self.component, self.message)
    }
}

/// Outcome of a resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingReport {
    /// Components that were priced.
    pub components: usize,
    /// Distinct queries sent to the source.
    pub queries: usize,
    pub warnings: Vec<PricingWarning>,
}

impl PricingReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A component awaiting its price, labelled with the node it belongs to.
struct Slot<'a> {
    resource: String,
    component: &'a mut CostComponent,
    query: usize,
}

fn collect_slots<'a>(label: String, resource: &'a mut Resource, slots: &mut Vec<Slot<'a>>) {
    for component in resource.cost_components.iter_mut() {
        slots.push(Slot {
            resource: label.clone(),
            component,
            query: 0,
        });
    }
    for sub in resource.sub_resources.iter_mut() {
        collect_slots(format!("{} {}", label, sub.name), sub, slots);
    }
}

/// Resolves component prices through a [`PricingSource`].
#[derive(Clone)]
pub struct PriceResolver {
    source: Arc<dyn PricingSource>,
    options: ResolverOptions,
}

impl PriceResolver {
    pub fn new(source: Arc<dyn PricingSource>) -> Self {
        Self {
            source,
            options: ResolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Price every component of the forest in place.
    ///
    /// Skipped and no-price nodes are left untouched. Identical queries are
    /// sent once. A transport failure aborts the outstanding queries and is
    /// returned. A query the source rejects prices its components at zero
    /// with a warning, as does pricing ambiguity.
    pub async fn resolve(&self, resources: &mut [Resource]) -> PricingResult<PricingReport> {
        let mut slots = Vec::new();
        for resource in resources.iter_mut().filter(|r| !r.is_skipped && !r.no_price) {
            let label = resource.name.clone();
            collect_slots(label, resource, &mut slots);
        }

        let mut queries: Vec<PriceQuery> = Vec::new();
        let mut index: HashMap<PriceQuery, usize> = HashMap::new();
        for slot in slots.iter_mut() {
            let query = PriceQuery::for_component(&*slot.component);
            slot.query = *index.entry(query.clone()).or_insert_with(|| {
                queries.push(query);
                queries.len() - 1
            });
        }

        info!(
            "Resolving prices for {} components with {} queries",
            slots.len(),
            queries.len()
        );
        let results = self.run_queries(&queries).await?;

        let mut report = PricingReport {
            components: slots.len(),
            queries: queries.len(),
            warnings: Vec::new(),
        };
        for slot in slots {
            let selection = match results.get(slot.query) {
                Some(Ok(products)) => select_price(products),
                Some(Err(message)) => PriceSelection::zero(vec![format!("Price query failed: {}, using 0.00", message)]),
                None => select_price(&[]),
            };

            slot.component.set_price(selection.price);
            if let Some(hash) = selection.price_hash {
                slot.component.set_price_hash(hash);
            }
            for message in selection.warnings {
                warn!("{} {}: {}", slot.resource, slot.component.name, message);
                report.warnings.push(PricingWarning {
                    resource: slot.resource.clone(),
                    component: slot.component.name.clone(),
                    message,
                });
            }
        }

        Ok(report)
    }

    /// Run the queries concurrently; results come back in query order.
    async fn run_queries(&self, queries: &[PriceQuery]) -> PricingResult<Vec<QueryProducts>> {
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let mut join_set = JoinSet::new();

        for (i, query) in queries.iter().enumerate() {
            let semaphore = semaphore.clone();
            let source = self.source.clone();
            let query = query.clone();

            join_set.spawn(async move {
                let result = async {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| PricingError::Task(e.to_string()))?;
                    source.query(&query).await
                }
                .await;
                (i, result)
            });
        }

        let mut results: Vec<QueryProducts> = vec![Ok(Vec::new()); queries.len()];
        let outcome = match self.options.timeout {
            Some(timeout) => tokio::time::timeout(timeout, join_all(&mut join_set, &mut results))
                .await
                .unwrap_or(Err(PricingError::Timeout(timeout.as_secs()))),
            None => join_all(&mut join_set, &mut results).await,
        };

        if outcome.is_err() {
            debug!("Aborting {} outstanding price queries", join_set.len());
            join_set.abort_all();
        }
        outcome.map(|_| results)
    }
}

impl fmt::Debug for PriceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceResolver").field("options", &self.options).finish()
    }
}

type QueryOutcome = (usize, PricingResult<Vec<ProductRecord>>);

/// Products for one query, or the reason the source rejected it.
type QueryProducts = Result<Vec<ProductRecord>, String>;

async fn join_all(join_set: &mut JoinSet<QueryOutcome>, results: &mut [QueryProducts]) -> PricingResult<()> {
    while let Some(joined) = join_set.join_next().await {
        let (i, result) = joined.map_err(|e| PricingError::Task(e.to_string()))?;
        results[i] = match result {
            Ok(products) => Ok(products),
            Err(PricingError::Query(message)) => {
                warn!("Price query rejected: {}", message);
                Err(message)
            }
            Err(e) => return Err(e),
        };
    }
    Ok(())
}

/// The price chosen for a component from a query result.
#[derive(Debug, PartialEq)]
struct PriceSelection {
    price: Decimal,
    price_hash: Option<String>,
    warnings: Vec<String>,
}

impl PriceSelection {
    fn zero(warnings: Vec<String>) -> Self {
        Self {
            price: Decimal::ZERO,
            price_hash: None,
            warnings,
        }
    }
}

/// First product, first price. Missing or unparseable prices become zero.
fn select_price(products: &[ProductRecord]) -> PriceSelection {
    let mut warnings = Vec::new();

    let product = match products.first() {
        Some(product) => product,
        None => return PriceSelection::zero(vec!["No products found, using 0.00".to_string()]),
    };
    if products.len() > 1 {
        warnings.push("Multiple products found, using the first product".to_string());
    }

    let price = match product.prices.first() {
        Some(price) => price,
        None => {
            warnings.push("No prices found, using 0.00".to_string());
            return PriceSelection::zero(warnings);
        }
    };
    if product.prices.len() > 1 {
        warnings.push("Multiple prices found, using the first price".to_string());
    }

    match parse_usd(&price.usd) {
        Some(usd) => PriceSelection {
            price: usd,
            price_hash: Some(price.price_hash.clone()).filter(|h| !h.is_empty()),
            warnings,
        },
        None => {
            warnings.push(format!("Invalid price '{}', using 0.00", price.usd));
            PriceSelection::zero(warnings)
        }
    }
}

fn parse_usd(usd: &str) -> Option<Decimal> {
    let usd = usd.trim();
    Decimal::from_str(usd)
        .or_else(|_| Decimal::from_scientific(usd))
        .ok()
}
