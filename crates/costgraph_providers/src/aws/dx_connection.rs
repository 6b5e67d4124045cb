use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, Resource};
use rust_decimal::Decimal;
use tracing::warn;

use super::region_location;
use crate::registry::RegistryItem;
use crate::util::{aws_filter, usage_decimal};

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("aws_dx_connection", new_dx_connection)
}

fn usage_str<'u>(usage: Option<&'u UsageData>, key: &str, default: &'u str) -> &'u str {
    match usage.map(|u| u.get_str(key)) {
        Some(value) if !value.is_empty() => value,
        _ => default,
    }
}

/// Port hours at the connection's capacity plus outbound transfer to the
/// Direct Connect location. Regions without a known location name are
/// skipped.
fn new_dx_connection(d: ResourceRef<'_>, u: Option<&UsageData>) -> Option<Resource> {
    let region = d.region();
    let Some(from_location) = region_location(region) else {
        warn!("Skipping {}: no location name for region {}", d.address, region);
        return None;
    };

    let dx_location = d.get_str("location");
    let capacity = d.get_str("bandwidth").replacen("bps", "", 1);
    let connection_type = usage_str(u, "dx_connection_type", "Dedicated");
    let interface_type = usage_str(u, "dx_virtual_interface_type", "Private");

    let mut transfer_filter = aws_filter(region, "AWSDirectConnect", "Data Transfer")
        .attribute(AttributeFilter::exact("fromLocation", from_location))
        .attribute(AttributeFilter::regex("usagetype", format!("/{}-DataXfer-Out/", dx_location)))
        .attribute(AttributeFilter::exact("virtualInterfaceType", interface_type));
    // Transfer prices are keyed by source location, not region.
    transfer_filter.region = None;

    Some(
        Resource::new(&d.address, &d.resource_type)
            .with_component(CostComponent::hourly(
                "DX connection",
                "hours",
                Some(Decimal::ONE),
                aws_filter(region, "AWSDirectConnect", "Direct Connect")
                    .attribute(AttributeFilter::regex("capacity", capacity))
                    .attribute(AttributeFilter::regex("usagetype", format!("/{}/", dx_location)))
                    .attribute(AttributeFilter::exact("connectionType", connection_type)),
            ))
            .with_component(CostComponent::monthly(
                format!("Outbound data transfer to dx location {}", dx_location),
                "GB",
                usage_decimal(u, "monthly_outbound_region_to_dx_location_gb"),
                transfer_filter,
            )),
    )
}
