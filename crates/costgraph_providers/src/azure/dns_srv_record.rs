use costgraph_plan::{ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, PriceFilter, Resource};
use rust_decimal::Decimal;

use super::lookup_location;
use crate::registry::RegistryItem;
use crate::util::{azure_filter, usage_decimal};

/// Queries in the first price tier.
const FIRST_TIER_QUERIES: i64 = 1_000_000_000;

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("azurerm_dns_srv_record", new_dns_srv_record)
}

/// DNS is priced per zone; most regions share "Zone 1".
fn dns_zone(location: &str) -> &'static str {
    let location = location.to_lowercase();
    if location.starts_with("usgov") {
        "US Gov Zone 1"
    } else if location.starts_with("germany") {
        "DE Zone 1"
    } else if location.starts_with("china") {
        "Zone 1 (China)"
    } else {
        "Zone 1"
    }
}

fn new_dns_srv_record(d: ResourceRef<'_>, u: Option<&UsageData>) -> Option<Resource> {
    let zone = dns_zone(lookup_location(d, &["resource_group_name"]));

    Some(
        Resource::new(&d.address, &d.resource_type)
            .with_components(dns_queries(zone, usage_decimal(u, "monthly_queries"))),
    )
}

/// Query components split over the two price tiers. Without usage only the
/// first tier is listed.
pub(crate) fn dns_queries(zone: &str, monthly_queries: Option<Decimal>) -> Vec<CostComponent> {
    let tier = |name: &str, start: &str, quantity: Option<Decimal>| {
        CostComponent::monthly(
            name,
            "1M queries",
            quantity,
            azure_filter(zone, "Azure DNS", "Networking")
                .attribute(AttributeFilter::exact("meterName", "Public Queries")),
        )
        .with_unit_multiplier(Decimal::new(1, 6))
        .with_price_filter(PriceFilter::purchase_option("Consumption").with_start_usage_amount(start))
    };

    let limit = Decimal::from(FIRST_TIER_QUERIES);
    match monthly_queries {
        None => vec![tier("DNS queries (first 1B)", "0", None)],
        Some(queries) if queries <= limit => vec![tier("DNS queries (first 1B)", "0", Some(queries))],
        Some(queries) => vec![
            tier("DNS queries (first 1B)", "0", Some(limit)),
            tier("DNS queries (over 1B)", "1000", Some(queries - limit)),
        ],
    }
}
