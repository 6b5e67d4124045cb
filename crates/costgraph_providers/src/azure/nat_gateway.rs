use costgraph_plan::{ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, PriceFilter, Resource};
use rust_decimal::Decimal;

use super::{lookup_location, pricing_zone};
use crate::registry::RegistryItem;
use crate::util::{azure_filter, usage_decimal};

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("azurerm_nat_gateway", new_nat_gateway)
}

fn new_nat_gateway(d: ResourceRef<'_>, u: Option<&UsageData>) -> Option<Resource> {
    let zone = pricing_zone(lookup_location(d, &["resource_group_name"]));

    let component = |name: &str, unit: &str, meter: &str, quantity: Option<Decimal>, hourly: bool| {
        let filter = azure_filter(zone, "NAT Gateway", "Networking")
            .attribute(AttributeFilter::exact("meterName", meter));
        let component = if hourly {
            CostComponent::hourly(name, unit, quantity, filter)
        } else {
            CostComponent::monthly(name, unit, quantity, filter)
        };
        component.with_price_filter(PriceFilter::purchase_option("Consumption"))
    };

    Some(
        Resource::new(&d.address, &d.resource_type)
            .with_component(component("NAT gateway", "hours", "Gateway", Some(Decimal::ONE), true))
            .with_component(component(
                "Data processed",
                "GB",
                "Data Processed",
                usage_decimal(u, "monthly_data_processed_gb"),
                false,
            )),
    )
}
