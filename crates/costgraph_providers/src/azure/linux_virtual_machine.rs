use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, PriceFilter, Resource};
use rust_decimal::Decimal;

use super::managed_disk::{managed_disk, DEFAULT_OS_DISK_SIZE};
use crate::registry::RegistryItem;
use crate::util::{azure_filter, usage_decimal};

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("azurerm_linux_virtual_machine", new_linux_virtual_machine)
        .with_notes(&["Non-standard images such as RHEL are not supported."])
}

fn new_linux_virtual_machine(d: ResourceRef<'_>, u: Option<&UsageData>) -> Option<Resource> {
    let region = d.get_str("location");
    let size = d.get_str("size");
    if size.is_empty() {
        return None;
    }

    let product_name = if size.starts_with("Basic_") {
        "/Virtual Machines .* Series Basic$/"
    } else {
        "/Virtual Machines .* Series$/"
    };

    let os_disk_type = match d.get_str("os_disk.0.storage_account_type") {
        "" => "Standard_LRS",
        t => t,
    };
    let os_disk_size = match d.get_i64("os_disk.0.disk_size_gb") {
        0 => DEFAULT_OS_DISK_SIZE,
        s => s,
    };

    Some(
        Resource::new(&d.address, &d.resource_type)
            .with_component(
                CostComponent::hourly(
                    format!("Instance usage (pay as you go, {})", size),
                    "hours",
                    Some(Decimal::ONE),
                    azure_filter(region, "Virtual Machines", "Compute")
                        .attribute(AttributeFilter::exact("skuName", vm_sku_name(size)))
                        .attribute(AttributeFilter::regex("productName", product_name))
                        .attribute(AttributeFilter::regex("meterName", "/^(?!.*Low Priority).*$/")),
                )
                .with_price_filter(PriceFilter::purchase_option("Consumption").with_unit("1 Hour")),
            )
            .with_sub_resource(managed_disk(
                "os_disk",
                region,
                os_disk_type,
                os_disk_size,
                usage_decimal(u, "os_disk.monthly_disk_operations"),
            )),
    )
}

/// Pricing sku name of a VM size, e.g. `Standard_D2s_v3` becomes `D2s v3`.
fn vm_sku_name(size: &str) -> String {
    size.trim_start_matches("Standard_")
        .trim_start_matches("Basic_")
        .replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::graph_with;
    use serde_json::json;

    #[test]
    fn test_vm_sku_name() {
        assert_eq!(vm_sku_name("Standard_D2s_v3"), "D2s v3");
        assert_eq!(vm_sku_name("Basic_A2"), "A2");
        assert_eq!(vm_sku_name("Standard_F2"), "F2");
    }

    #[test]
    fn test_linux_vm_with_os_disk() {
        let graph = graph_with(
            "azurerm_linux_virtual_machine",
            "azurerm_linux_virtual_machine.app",
            json!({
                "location": "eastus",
                "size": "Standard_F2",
                "os_disk": [{"storage_account_type": "StandardSSD_LRS", "disk_size_gb": 100}]
            }),
        );
        let usage = UsageData::new(
            "azurerm_linux_virtual_machine.app",
            json!({"os_disk": {"monthly_disk_operations": 20000}}),
        );
        let r = new_linux_virtual_machine(graph.get("azurerm_linux_virtual_machine.app").unwrap(), Some(&usage))
            .unwrap();

        assert_eq!(r.cost_components[0].name, "Instance usage (pay as you go, Standard_F2)");
        let disk = &r.sub_resources[0];
        assert_eq!(disk.name, "os_disk");
        assert_eq!(disk.cost_components[0].name, "Storage (E10)");
        assert_eq!(disk.cost_components[1].quantity, Some(Decimal::from(20000)));
    }

    #[test]
    fn test_default_os_disk() {
        let graph = graph_with(
            "azurerm_linux_virtual_machine",
            "azurerm_linux_virtual_machine.app",
            json!({"location": "westeurope", "size": "Basic_A2"}),
        );
        let r = new_linux_virtual_machine(graph.get("azurerm_linux_virtual_machine.app").unwrap(), None).unwrap();

        let disk = &r.sub_resources[0];
        assert_eq!(disk.cost_components[0].name, "Storage (S4)");
        assert!(disk.cost_components[1].quantity.is_none());
    }

    #[test]
    fn test_missing_size_is_unsupported() {
        let graph = graph_with("azurerm_linux_virtual_machine", "azurerm_linux_virtual_machine.app", json!({}));
        assert!(new_linux_virtual_machine(graph.get("azurerm_linux_virtual_machine.app").unwrap(), None).is_none());
    }
}
