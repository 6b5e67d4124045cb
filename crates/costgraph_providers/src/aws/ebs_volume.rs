use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, Resource};
use rust_decimal::Decimal;

use crate::registry::RegistryItem;
use crate::util::{aws_filter, decimal_from_f64, DEFAULT_VOLUME_SIZE};

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("aws_ebs_volume", new_ebs_volume)
}

fn new_ebs_volume(d: ResourceRef<'_>, _u: Option<&UsageData>) -> Option<Resource> {
    let volume_type = match d.get_str("type") {
        "" => "gp2",
        t => t,
    };
    let size = if d.exists("size") {
        decimal_from_f64(d.get_f64("size"))
    } else {
        Decimal::from(DEFAULT_VOLUME_SIZE)
    };
    let iops = decimal_from_f64(d.get_f64("iops"));

    Some(
        Resource::new(&d.address, &d.resource_type)
            .with_components(ebs_volume_cost_components(d.region(), volume_type, size, iops)),
    )
}

/// Storage, IOPS and I/O request components of an EBS volume.
pub(crate) fn ebs_volume_cost_components(
    region: &str,
    volume_type: &str,
    size: Decimal,
    iops: Decimal,
) -> Vec<CostComponent> {
    let name = match volume_type {
        "standard" => "Magnetic storage",
        "io1" => "Provisioned IOPS SSD storage (io1)",
        "io2" => "Provisioned IOPS SSD storage (io2)",
        "st1" => "Throughput Optimized HDD storage (st1)",
        "sc1" => "Cold HDD storage (sc1)",
        "gp3" => "General Purpose SSD storage (gp3)",
        _ => "General Purpose SSD storage (gp2)",
    };

    let mut components = vec![CostComponent::monthly(
        name,
        "GB-months",
        Some(size),
        aws_filter(region, "AmazonEC2", "Storage").attribute(AttributeFilter::exact("volumeApiName", volume_type)),
    )];

    if volume_type == "io1" || volume_type == "io2" {
        components.push(CostComponent::monthly(
            "Provisioned IOPS",
            "IOPS-months",
            Some(iops),
            aws_filter(region, "AmazonEC2", "System Operation")
                .attribute(AttributeFilter::exact("volumeApiName", volume_type))
                .attribute(AttributeFilter::regex("usagetype", "/EBS:VolumeP-IOPS/")),
        ));
    }

    if volume_type == "standard" {
        components.push(CostComponent::monthly(
            "I/O requests",
            "requests",
            Some(Decimal::ZERO),
            aws_filter(region, "AmazonEC2", "System Operation")
                .attribute(AttributeFilter::exact("volumeApiName", volume_type))
                .attribute(AttributeFilter::regex("usagetype", "/EBS:VolumeIOUsage/")),
        ));
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::graph_with;
    use serde_json::json;

    #[test]
    fn test_default_volume() {
        let graph = graph_with("aws_ebs_volume", "aws_ebs_volume.data", json!({"region": "us-east-1"}));
        let r = new_ebs_volume(graph.get("aws_ebs_volume.data").unwrap(), None).unwrap();

        assert_eq!(r.cost_components.len(), 1);
        let storage = &r.cost_components[0];
        assert_eq!(storage.name, "General Purpose SSD storage (gp2)");
        assert_eq!(storage.quantity, Some(Decimal::from(8)));
        assert_eq!(storage.product_filter.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_io1_volume_has_iops() {
        let graph = graph_with(
            "aws_ebs_volume",
            "aws_ebs_volume.db",
            json!({"type": "io1", "size": 100, "iops": 3000}),
        );
        let r = new_ebs_volume(graph.get("aws_ebs_volume.db").unwrap(), None).unwrap();

        let names: Vec<&str> = r.cost_components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Provisioned IOPS SSD storage (io1)", "Provisioned IOPS"]);
        assert_eq!(r.cost_components[0].quantity, Some(Decimal::from(100)));
        assert_eq!(r.cost_components[1].quantity, Some(Decimal::from(3000)));
    }

    #[test]
    fn test_magnetic_volume_has_io_requests() {
        let graph = graph_with("aws_ebs_volume", "aws_ebs_volume.old", json!({"type": "standard"}));
        let r = new_ebs_volume(graph.get("aws_ebs_volume.old").unwrap(), None).unwrap();
        assert_eq!(r.cost_components[1].name, "I/O requests");
    }
}
