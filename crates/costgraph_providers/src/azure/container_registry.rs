use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, PriceFilter, Resource};
use rust_decimal::Decimal;

use crate::registry::RegistryItem;
use crate::util::{azure_filter, usage_decimal};

const DAYS_IN_MONTH: i64 = 30;

/// Build minutes beyond this many vCPU seconds are billed.
const FREE_BUILD_VCPU_SECONDS: &str = "6000";

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("azurerm_container_registry", new_container_registry)
}

/// Storage included in the daily registry unit of each SKU, in GB.
fn included_storage_gb(sku: &str) -> Option<Decimal> {
    match sku {
        "Classic" | "Basic" => Some(Decimal::from(10)),
        "Standard" => Some(Decimal::from(100)),
        "Premium" => Some(Decimal::from(500)),
        _ => None,
    }
}

/// Number of replica locations, from either the legacy list or the blocks.
fn replica_count(d: &ResourceRef<'_>) -> usize {
    let legacy = d.get_array("georeplication_locations").len();
    if legacy > 0 {
        return legacy;
    }
    d.get_array("georeplications").len()
}

fn new_container_registry(d: ResourceRef<'_>, u: Option<&UsageData>) -> Option<Resource> {
    let location = d.get_str("location");
    let sku = match d.get_str("sku") {
        "" => "Classic",
        other => other,
    };
    let included = included_storage_gb(sku)?;

    let component = |name: String, unit: &str, meter: String, quantity: Option<Decimal>| {
        CostComponent::monthly(
            name,
            unit,
            quantity,
            azure_filter(location, "Container Registry", "Containers")
                .attribute(AttributeFilter::exact("productName", "Container Registry"))
                .attribute(AttributeFilter::exact("skuName", sku))
                .attribute(AttributeFilter::exact("meterName", meter)),
        )
        .with_price_filter(PriceFilter::purchase_option("Consumption"))
    };

    let registry_unit = format!("{} Registry Unit", sku);
    let mut resource = Resource::new(&d.address, &d.resource_type).with_component(component(
        format!("Registry usage ({})", sku),
        "days",
        registry_unit.clone(),
        Some(Decimal::from(DAYS_IN_MONTH)),
    ));

    let replicas = replica_count(&d);
    if replicas > 0 {
        let plural = if replicas == 1 { "location" } else { "locations" };
        resource = resource.with_component(component(
            format!("Geo replication ({} {})", replicas, plural),
            "days",
            registry_unit,
            Some(Decimal::from(DAYS_IN_MONTH * replicas as i64)),
        ));
    }

    // Storage is only billed above the SKU allowance.
    let storage = usage_decimal(u, "storage_gb");
    if storage.map_or(true, |gb| gb > included) {
        resource = resource.with_component(component(
            format!("Storage (over {} GB)", included),
            "GB-months",
            "Data Stored".to_string(),
            storage.map(|gb| gb - included),
        ));
    }

    let build_seconds = usage_decimal(u, "monthly_build_vcpu_hrs").map(|hours| hours * Decimal::from(3600));
    let mut build = component("Build vCPU".to_string(), "seconds", "Task vCPU Duration".to_string(), build_seconds);
    build.price_filter =
        Some(PriceFilter::purchase_option("Consumption").with_start_usage_amount(FREE_BUILD_VCPU_SECONDS));

    Some(resource.with_component(build))
}
