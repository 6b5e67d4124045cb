use costgraph_plan::{ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, PriceFilter, Resource};
use rust_decimal::Decimal;

use crate::registry::RegistryItem;
use crate::util::aws_filter;

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("aws_eks_fargate_profile", new_eks_fargate_profile)
}

fn new_eks_fargate_profile(d: ResourceRef<'_>, _u: Option<&UsageData>) -> Option<Resource> {
    let region = d.region();

    let fargate = |name: &str, unit: &str, usage_type: &str| {
        CostComponent::hourly(
            name,
            unit,
            Some(Decimal::ONE),
            aws_filter(region, "AmazonEKS", "Compute").attribute(AttributeFilter::regex("usagetype", usage_type)),
        )
        .with_price_filter(PriceFilter::on_demand())
    };

    Some(
        Resource::new(&d.address, &d.resource_type)
            .with_component(fargate("Per GB per hour", "GB", "/Fargate-GB-Hours/"))
            .with_component(fargate("Per vCPU per hour", "CPU", "/Fargate-vCPU-Hours:perCPU/")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::graph_with;
    use serde_json::json;

    #[test]
    fn test_fargate_profile() {
        let graph = graph_with(
            "aws_eks_fargate_profile",
            "aws_eks_fargate_profile.p",
            json!({"region": "us-east-2"}),
        );
        let r = new_eks_fargate_profile(graph.get("aws_eks_fargate_profile.p").unwrap(), None).unwrap();

        assert_eq!(r.cost_components.len(), 2);
        assert_eq!(r.cost_components[0].name, "Per GB per hour");
        assert_eq!(r.cost_components[1].unit, "CPU");
        assert_eq!(r.cost_components[1].product_filter.service.as_deref(), Some("AmazonEKS"));
    }
}
