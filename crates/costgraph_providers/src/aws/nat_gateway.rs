use costgraph_plan::{ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, Resource};
use rust_decimal::Decimal;

use crate::registry::RegistryItem;
use crate::util::{aws_filter, usage_decimal};

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("aws_nat_gateway", new_nat_gateway)
}

fn new_nat_gateway(d: ResourceRef<'_>, u: Option<&UsageData>) -> Option<Resource> {
    let region = d.region();

    Some(
        Resource::new(&d.address, &d.resource_type)
            .with_component(CostComponent::hourly(
                "NAT gateway",
                "hours",
                Some(Decimal::ONE),
                aws_filter(region, "AmazonEC2", "NAT Gateway")
                    .attribute(AttributeFilter::regex("usagetype", "/NatGateway-Hours/")),
            ))
            .with_component(CostComponent::monthly(
                "Data processed",
                "GB",
                usage_decimal(u, "monthly_data_processed_gb"),
                aws_filter(region, "AmazonEC2", "NAT Gateway")
                    .attribute(AttributeFilter::regex("usagetype", "/NatGateway-Bytes/")),
            )),
    )
}
