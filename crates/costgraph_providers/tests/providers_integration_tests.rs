//! Integration tests from plan JSON to cost model forests.

use costgraph_plan::parse_plan;
use costgraph_providers::default_registry;
use costgraph_providers::registry::UNSUPPORTED_MESSAGE;
use costgraph_schema::ResourceSummary;
use rust_decimal::Decimal;
use serde_json::json;

#[test]
fn test_plan_to_resources() {
    let plan = json!({
        "planned_values": {"root_module": {"resources": [
            {"address": "aws_instance.web", "type": "aws_instance", "provider_name": "aws",
             "values": {"instance_type": "t3.micro", "root_block_device": [{"volume_size": 20}]}},
            {"address": "aws_vpc.main", "type": "aws_vpc", "provider_name": "aws", "values": {}},
            {"address": "aws_lambda_function.f", "type": "aws_lambda_function", "provider_name": "aws", "values": {}},
            {"address": "data.aws_ami.ubuntu", "type": "aws_ami", "provider_name": "aws", "values": {}}
        ]}},
        "configuration": {
            "provider_config": {"aws": {"expressions": {"region": {"constant_value": "eu-west-2"}}}},
            "root_module": {}
        }
    });
    let parsed = parse_plan(plan.to_string().as_bytes()).unwrap();
    let resources = default_registry().build_resources(&parsed.current);

    let names: Vec<&str> = resources.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["aws_instance.web", "aws_lambda_function.f", "aws_vpc.main"]);

    let instance = &resources[0];
    assert_eq!(instance.resource_type, "aws_instance");
    assert_eq!(instance.cost_components[0].product_filter.region.as_deref(), Some("eu-west-2"));
    assert_eq!(instance.sub_resources[0].cost_components[0].quantity, Some(Decimal::from(20)));

    assert_eq!(resources[1].skip_message.as_deref(), Some(UNSUPPORTED_MESSAGE));
    assert!(resources[2].no_price);

    let summary = ResourceSummary::from_resources(&resources);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.total_supported, 1);
    assert_eq!(summary.total_unsupported, 1);
    assert_eq!(summary.total_no_price, 1);
}

#[test]
fn test_azure_resource_group_location_is_followed() {
    let plan = json!({
        "planned_values": {"root_module": {"resources": [
            {"address": "azurerm_resource_group.rg", "type": "azurerm_resource_group",
             "provider_name": "azurerm", "values": {"location": "chinanorth"}},
            {"address": "azurerm_nat_gateway.nat", "type": "azurerm_nat_gateway",
             "provider_name": "azurerm", "values": {"location": "chinanorth"}}
        ]}},
        "configuration": {"root_module": {"resources": [
            {"address": "azurerm_resource_group.rg", "expressions": {}},
            {"address": "azurerm_nat_gateway.nat", "expressions": {
                "resource_group_name": {"references": ["azurerm_resource_group.rg.name", "azurerm_resource_group.rg"]}
            }}
        ]}}
    });
    let parsed = parse_plan(plan.to_string().as_bytes()).unwrap();
    let resources = default_registry().build_resources(&parsed.current);

    let nat = resources.iter().find(|r| r.name == "azurerm_nat_gateway.nat").unwrap();
    assert_eq!(nat.cost_components[0].product_filter.region.as_deref(), Some("China"));
}
