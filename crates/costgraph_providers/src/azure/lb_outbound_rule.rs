use costgraph_plan::{ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, PriceFilter, Resource};
use rust_decimal::Decimal;

use super::{lookup_location, pricing_zone};
use crate::registry::RegistryItem;
use crate::util::azure_filter;

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("azurerm_lb_outbound_rule", new_lb_outbound_rule)
}

fn new_lb_outbound_rule(d: ResourceRef<'_>, _u: Option<&UsageData>) -> Option<Resource> {
    let zone = pricing_zone(lookup_location(d, &["loadbalancer_id", "resource_group_name"]));

    Some(Resource::new(&d.address, &d.resource_type).with_component(rule_usage(zone)))
}

/// Hourly charge for a load balancer rule beyond the included five.
pub(crate) fn rule_usage(zone: &str) -> CostComponent {
    CostComponent::hourly(
        "Rule usage",
        "hours",
        Some(Decimal::ONE),
        azure_filter(zone, "Load Balancer", "Networking")
            .attribute(AttributeFilter::exact("meterName", "Overage LB Rules and Outbound Rules")),
    )
    .with_price_filter(PriceFilter::purchase_option("Consumption"))
}
