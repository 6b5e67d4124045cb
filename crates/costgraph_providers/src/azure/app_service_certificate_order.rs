use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, PriceFilter, Resource};
use rust_decimal::Decimal;

use crate::registry::RegistryItem;
use crate::util::azure_filter;

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("azurerm_app_service_certificate_order", new_certificate_order)
}

/// Certificates are sold per year; the monthly share is one twelfth.
fn new_certificate_order(d: ResourceRef<'_>, _u: Option<&UsageData>) -> Option<Resource> {
    let region = if d.get_str("location").to_lowercase().starts_with("usgov") {
        "US Gov"
    } else {
        "Global"
    };

    let product_type = match d.get_str("product_type") {
        "" => "Standard",
        other => other,
    };

    Some(
        Resource::new(&d.address, &d.resource_type).with_component(
            CostComponent::monthly(
                format!("SSL certificate ({})", product_type),
                "years",
                Some(Decimal::ONE / Decimal::from(12)),
                azure_filter(region, "Azure App Service", "Compute").attribute(AttributeFilter::regex(
                    "skuName",
                    format!("/{} SSL - 1 Year/i", product_type),
                )),
            )
            .with_price_filter(PriceFilter::purchase_option("Consumption")),
        ),
    )
}
