use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, Resource};
use rust_decimal::Decimal;

use crate::registry::RegistryItem;
use crate::util::{aws_filter, usage_decimal};

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("aws_kms_key", new_kms_key)
}

fn new_kms_key(d: ResourceRef<'_>, u: Option<&UsageData>) -> Option<Resource> {
    let region = d.region();

    let spec = d.get_str("customer_master_key_spec");
    let requests_usage_type = if spec.starts_with("RSA_") {
        "/KMS-Requests-Asymmetric-RSA/"
    } else if spec.starts_with("ECC_") {
        "/KMS-Requests-Asymmetric/"
    } else {
        "/KMS-Requests$/"
    };

    Some(
        Resource::new(&d.address, &d.resource_type)
            .with_component(CostComponent::monthly(
                "Customer master key",
                "months",
                Some(Decimal::ONE),
                aws_filter(region, "awskms", "Encryption Key")
                    .attribute(AttributeFilter::regex("usagetype", "/KMS-Keys/")),
            ))
            .with_component(CostComponent::monthly(
                "Requests",
                "requests",
                usage_decimal(u, "monthly_requests"),
                aws_filter(region, "awskms", "API Request")
                    .attribute(AttributeFilter::regex("usagetype", requests_usage_type)),
            )),
    )
}
