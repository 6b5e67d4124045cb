//! Azure cost models.
//!
//! Azure records carry their region in `location`.

mod app_service_certificate_order;
mod app_service_custom_hostname_binding;
mod container_registry;
mod dns_srv_record;
mod lb_outbound_rule;
mod linux_virtual_machine;
mod managed_disk;
mod mariadb_server;
mod nat_gateway;

use costgraph_plan::{Attributes, ResourceRef};

use crate::registry::RegistryItem;

pub fn registry_items() -> Vec<RegistryItem> {
    vec![
        app_service_certificate_order::registry_item(),
        app_service_custom_hostname_binding::registry_item(),
        container_registry::registry_item(),
        dns_srv_record::registry_item(),
        lb_outbound_rule::registry_item(),
        linux_virtual_machine::registry_item(),
        mariadb_server::registry_item(),
        nat_gateway::registry_item(),
    ]
}

/// Location of the first referenced record that declares one, falling back
/// to the record's own `location`.
pub(crate) fn lookup_location<'g>(d: ResourceRef<'g>, attributes: &[&str]) -> &'g str {
    attributes
        .iter()
        .filter_map(|attribute| d.reference(attribute))
        .map(|target| target.data().get_str("location"))
        .find(|location| !location.is_empty())
        .unwrap_or_else(|| d.data().get_str("location"))
}

/// Networking services are priced per zone rather than per region.
pub(crate) fn pricing_zone(location: &str) -> &'static str {
    let location = location.to_lowercase();
    if location.starts_with("usgov") {
        "US Gov"
    } else if location.contains("china") {
        "China"
    } else {
        "Global"
    }
}

pub const FREE_RESOURCES: &[&str] = &[
    "azurerm_app_service_certificate_binding",
    "azurerm_app_service_slot_virtual_network_swift_connection",
    "azurerm_app_service_source_control_token",
    "azurerm_app_service_virtual_network_swift_connection",
    "azurerm_mariadb_configuration",
    "azurerm_mariadb_database",
    "azurerm_mariadb_firewall_rule",
    "azurerm_mariadb_virtual_network_rule",
    "azurerm_nat_gateway_public_ip_association",
    "azurerm_network_interface",
    "azurerm_network_interface_security_group_association",
    "azurerm_network_security_group",
    "azurerm_network_security_rule",
    "azurerm_resource_group",
    "azurerm_subnet",
    "azurerm_subnet_nat_gateway_association",
    "azurerm_subnet_network_security_group_association",
    "azurerm_virtual_network",
];
