use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, PriceFilter, Resource};
use rust_decimal::Decimal;

use super::lookup_location;
use crate::registry::RegistryItem;
use crate::util::azure_filter;

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("azurerm_app_service_custom_hostname_binding", new_custom_hostname_binding)
        .with_notes(&["SNI SSL bindings are free."])
}

/// Only IP based SSL (`IpBasedEnabled`) is billed.
fn new_custom_hostname_binding(d: ResourceRef<'_>, _u: Option<&UsageData>) -> Option<Resource> {
    let ssl_state = d.get_str("ssl_state");
    if !ssl_state.to_uppercase().starts_with("IP") {
        return Some(Resource::free(&d.address, &d.resource_type));
    }

    let location = lookup_location(d, &["resource_group_name"]);

    Some(
        Resource::new(&d.address, &d.resource_type).with_component(
            CostComponent::monthly(
                "IP SSL certificate",
                "months",
                Some(Decimal::ONE),
                azure_filter(location, "Azure App Service", "Compute")
                    .attribute(AttributeFilter::exact("skuName", "IP SSL")),
            )
            .with_price_filter(PriceFilter::purchase_option("Consumption")),
        ),
    )
}
