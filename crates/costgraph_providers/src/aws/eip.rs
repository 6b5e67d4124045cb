use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, PriceFilter, Resource};
use rust_decimal::Decimal;

use crate::registry::RegistryItem;
use crate::util::aws_filter;

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("aws_eip", new_eip)
}

/// An Elastic IP is only charged while it is not attached.
fn new_eip(d: ResourceRef<'_>, _u: Option<&UsageData>) -> Option<Resource> {
    let attached = ["customer_owned_ipv4_pool", "instance", "network_interface"]
        .iter()
        .any(|key| !d.get_str(key).is_empty());

    if attached {
        return Some(Resource::free(&d.address, &d.resource_type));
    }

    Some(
        Resource::new(&d.address, &d.resource_type).with_component(
            CostComponent::hourly(
                "IP address (if unused)",
                "hours",
                Some(Decimal::ONE),
                aws_filter(d.region(), "AmazonEC2", "IP Address")
                    .attribute(AttributeFilter::regex("usagetype", "/ElasticIP:IdleAddress/")),
            )
            .with_price_filter(PriceFilter::default().with_start_usage_amount("1")),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::graph_with;
    use serde_json::json;

    #[test]
    fn test_unattached_eip() {
        let graph = graph_with("aws_eip", "aws_eip.ip", json!({"region": "us-east-1"}));
        let r = new_eip(graph.get("aws_eip.ip").unwrap(), None).unwrap();

        assert_eq!(r.cost_components[0].name, "IP address (if unused)");
        assert_eq!(
            r.cost_components[0].price_filter.as_ref().and_then(|p| p.start_usage_amount.as_deref()),
            Some("1")
        );
    }

    #[test]
    fn test_attached_eip_is_free() {
        let graph = graph_with("aws_eip", "aws_eip.ip", json!({"instance": "i-123"}));
        let r = new_eip(graph.get("aws_eip.ip").unwrap(), None).unwrap();
        assert!(r.no_price);
        assert!(r.cost_components.is_empty());
    }
}
