use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, ProductFilter, Resource};
use rust_decimal::Decimal;

use crate::registry::RegistryItem;
use crate::util::{azure_filter, usage_decimal};

const SERVICE: &str = "Azure Database for MariaDB";

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("azurerm_mariadb_server", new_mariadb_server)
}

fn filter(region: &str) -> ProductFilter {
    azure_filter(region, SERVICE, "Databases")
}

/// Sku names look like `GP_Gen5_4`: tier, hardware family and vCores.
fn new_mariadb_server(d: ResourceRef<'_>, u: Option<&UsageData>) -> Option<Resource> {
    let region = d.get_str("location");
    let sku = d.get_str("sku_name");

    let mut parts = sku.split('_');
    let (tier, family, cores) = match (parts.next(), parts.next(), parts.next()) {
        (Some(tier), Some(family), Some(cores)) => (tier, family, cores),
        _ => return None,
    };
    let tier_name = match tier {
        "B" => "Basic",
        "GP" => "General Purpose",
        "MO" => "Memory Optimized",
        _ => return None,
    };

    // Memory optimized storage is billed at the general purpose rate.
    let storage_tier = if tier == "MO" { "General Purpose" } else { tier_name };
    let storage_gb = Decimal::from(d.get_i64("storage_mb")) / Decimal::from(1024);

    let backup_sku = if d.get_bool("geo_redundant_backup_enabled") {
        "Backup GRS"
    } else {
        "Backup LRS"
    };

    Some(
        Resource::new(&d.address, &d.resource_type)
            .with_component(CostComponent::hourly(
                format!("Compute ({})", sku),
                "hours",
                Some(Decimal::ONE),
                filter(region)
                    .attribute(AttributeFilter::regex(
                        "productName",
                        format!("/{} - Compute {}/", tier_name, family),
                    ))
                    .attribute(AttributeFilter::exact("skuName", format!("{} vCore", cores))),
            ))
            .with_component(CostComponent::monthly(
                "Storage",
                "GB-months",
                Some(storage_gb),
                filter(region)
                    .attribute(AttributeFilter::regex("productName", format!("/{} - Storage/", storage_tier))),
            ))
            .with_component(CostComponent::monthly(
                "Additional backup storage",
                "GB-months",
                usage_decimal(u, "additional_backup_storage_gb"),
                filter(region)
                    .attribute(AttributeFilter::regex("productName", "/Backup Storage/"))
                    .attribute(AttributeFilter::exact("skuName", backup_sku)),
            )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::graph_with;
    use serde_json::json;

    fn attribute<'a>(component: &'a CostComponent, key: &str) -> Option<&'a AttributeFilter> {
        component.product_filter.attribute_filters.iter().find(|a| a.key == key)
    }

    #[test]
    fn test_general_purpose_server() {
        let graph = graph_with(
            "azurerm_mariadb_server",
            "azurerm_mariadb_server.db",
            json!({
                "location": "eastus",
                "sku_name": "GP_Gen5_4",
                "storage_mb": 5120,
                "geo_redundant_backup_enabled": true
            }),
        );
        let r = new_mariadb_server(graph.get("azurerm_mariadb_server.db").unwrap(), None).unwrap();

        let compute = &r.cost_components[0];
        assert_eq!(compute.name, "Compute (GP_Gen5_4)");
        assert_eq!(
            attribute(compute, "productName").unwrap().value_regex.as_deref(),
            Some("/General Purpose - Compute Gen5/")
        );
        assert_eq!(attribute(compute, "skuName").unwrap().value.as_deref(), Some("4 vCore"));

        assert_eq!(r.cost_components[1].quantity, Some(Decimal::from(5)));

        let backup = &r.cost_components[2];
        assert!(backup.quantity.is_none());
        assert_eq!(attribute(backup, "skuName").unwrap().value.as_deref(), Some("Backup GRS"));
    }

    #[test]
    fn test_memory_optimized_storage_uses_general_purpose_rate() {
        let graph = graph_with(
            "azurerm_mariadb_server",
            "azurerm_mariadb_server.db",
            json!({"location": "eastus", "sku_name": "MO_Gen5_2", "storage_mb": 10240}),
        );
        let usage = UsageData::new("azurerm_mariadb_server.db", json!({"additional_backup_storage_gb": 50}));
        let r = new_mariadb_server(graph.get("azurerm_mariadb_server.db").unwrap(), Some(&usage)).unwrap();

        assert_eq!(
            attribute(&r.cost_components[1], "productName").unwrap().value_regex.as_deref(),
            Some("/General Purpose - Storage/")
        );
        assert_eq!(r.cost_components[2].quantity, Some(Decimal::from(50)));
    }

    #[test]
    fn test_malformed_sku_is_unsupported() {
        for sku in ["", "GP_Gen5", "XX_Gen5_2"] {
            let graph = graph_with(
                "azurerm_mariadb_server",
                "azurerm_mariadb_server.db",
                json!({"location": "eastus", "sku_name": sku}),
            );
            assert!(new_mariadb_server(graph.get("azurerm_mariadb_server.db").unwrap(), None).is_none());
        }
    }
}
