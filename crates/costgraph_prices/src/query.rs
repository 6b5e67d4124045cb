//! Price queries derived from cost components.

use costgraph_schema::{CostComponent, PriceFilter, ProductFilter};
use serde_json::{json, Value};

const PRICES_QUERY: &str = "query($filter: ProductFilter!, $priceFilter: PriceFilter) {
  products(filter: $filter) {
    prices(filter: $priceFilter) {
      priceHash
      USD
    }
  }
}";

/// One lookup against a pricing source.
///
/// Components with equal filters produce equal queries, so a resolver can
/// send each distinct query once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceQuery {
    pub product_filter: ProductFilter,
    pub price_filter: Option<PriceFilter>,
}

impl PriceQuery {
    pub fn new(product_filter: ProductFilter, price_filter: Option<PriceFilter>) -> Self {
        Self {
            product_filter,
            price_filter,
        }
    }

    pub fn for_component(component: &CostComponent) -> Self {
        Self::new(component.product_filter.clone(), component.price_filter.clone())
    }

    /// GraphQL request body for this query.
    pub fn to_graphql(&self) -> Value {
        json!({
            "query": PRICES_QUERY,
            "variables": {
                "filter": self.product_filter,
                "priceFilter": self.price_filter,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costgraph_schema::AttributeFilter;
    use rust_decimal::Decimal;

    #[test]
    fn test_graphql_variables() {
        let query = PriceQuery::new(
            ProductFilter::new("aws")
                .region("us-east-1")
                .service("AmazonEC2")
                .attribute(AttributeFilter::regex("usagetype", "/EBS:VolumeUsage.gp2$/")),
            Some(PriceFilter::on_demand()),
        );
        let body = query.to_graphql();

        assert!(body["query"].as_str().unwrap().contains("products(filter: $filter)"));
        let filter = &body["variables"]["filter"];
        assert_eq!(filter["vendorName"], "aws");
        assert_eq!(filter["attributeFilters"][0]["value_regex"], "/EBS:VolumeUsage.gp2$/");
        assert!(filter.get("productFamily").is_none());
        assert_eq!(body["variables"]["priceFilter"]["purchaseOption"], "on_demand");
    }

    #[test]
    fn test_missing_price_filter_is_null() {
        let query = PriceQuery::new(ProductFilter::new("azure"), None);
        assert!(query.to_graphql()["variables"]["priceFilter"].is_null());
    }

    #[test]
    fn test_equal_components_share_a_query() {
        let component = |name: &str| {
            CostComponent::hourly(name, "hours", Some(Decimal::ONE), ProductFilter::new("aws").service("AmazonEC2"))
        };
        assert_eq!(
            PriceQuery::for_component(&component("a")),
            PriceQuery::for_component(&component("b"))
        );
    }
}
