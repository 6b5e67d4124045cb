//! Shared helpers for cost model constructors.

use costgraph_plan::{Attributes, UsageData};
use costgraph_schema::ProductFilter;
use rust_decimal::Decimal;

/// Volume size used when a block device does not declare one.
pub const DEFAULT_VOLUME_SIZE: i64 = 8;

/// Convert a float read from plan values; non-finite values become zero.
pub fn decimal_from_f64(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default()
}

/// A usage value as a decimal, or `None` when the usage is not given.
pub fn usage_decimal(usage: Option<&UsageData>, key: &str) -> Option<Decimal> {
    let usage = usage?;
    if !usage.exists(key) {
        return None;
    }
    Some(decimal_from_f64(usage.get_f64(key)))
}

pub fn aws_filter(region: &str, service: &str, product_family: &str) -> ProductFilter {
    ProductFilter::new("aws")
        .region(region)
        .service(service)
        .product_family(product_family)
}

pub fn azure_filter(region: &str, service: &str, product_family: &str) -> ProductFilter {
    ProductFilter::new("azure")
        .region(region)
        .service(service)
        .product_family(product_family)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_usage_decimal() {
        let usage = UsageData::new("a.b", json!({"monthly_requests": 1500, "ratio": "0.5"}));
        assert_eq!(usage_decimal(Some(&usage), "monthly_requests"), Some(Decimal::from(1500)));
        assert_eq!(usage_decimal(Some(&usage), "ratio"), Some(Decimal::new(5, 1)));
        assert_eq!(usage_decimal(Some(&usage), "missing"), None);
        assert_eq!(usage_decimal(None, "monthly_requests"), None);
    }

    #[test]
    fn test_decimal_from_f64() {
        assert_eq!(decimal_from_f64(20.0), Decimal::from(20));
        assert_eq!(decimal_from_f64(f64::NAN), Decimal::ZERO);
    }
}
