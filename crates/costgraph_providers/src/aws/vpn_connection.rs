use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, Resource};
use rust_decimal::Decimal;

use crate::registry::RegistryItem;
use crate::util::{aws_filter, usage_decimal};

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("aws_vpn_connection", new_vpn_connection)
}

fn new_vpn_connection(d: ResourceRef<'_>, u: Option<&UsageData>) -> Option<Resource> {
    let region = d.region();

    let mut resource = Resource::new(&d.address, &d.resource_type).with_component(CostComponent::hourly(
        "VPN connection",
        "hours",
        Some(Decimal::ONE),
        aws_filter(region, "AmazonVPC", "Cloud Connectivity"),
    ));

    if !d.get_str("transit_gateway_id").is_empty() {
        resource = resource
            .with_component(transit_gateway_attachment(region, "TransitGatewayVPN"))
            .with_component(transit_gateway_data_processed(
                region,
                "TransitGatewayVPN",
                usage_decimal(u, "monthly_data_processed_gb"),
            ));
    }

    Some(resource)
}

fn transit_gateway_attachment(region: &str, operation: &str) -> CostComponent {
    CostComponent::hourly(
        "Transit gateway attachment",
        "hours",
        Some(Decimal::ONE),
        aws_filter(region, "AmazonVPC", "AmazonVPC")
            .attribute(AttributeFilter::regex("usagetype", "/TransitGateway-Hours/"))
            .attribute(AttributeFilter::exact("operation", operation)),
    )
}

fn transit_gateway_data_processed(region: &str, operation: &str, gb: Option<Decimal>) -> CostComponent {
    CostComponent::monthly(
        "Data processed",
        "GB",
        gb,
        aws_filter(region, "AmazonVPC", "AmazonVPC")
            .attribute(AttributeFilter::regex("usagetype", "/TransitGateway-Bytes/"))
            .attribute(AttributeFilter::exact("operation", operation)),
    )
}
