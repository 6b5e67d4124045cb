use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, PriceFilter, Resource};
use rust_decimal::Decimal;

use crate::registry::RegistryItem;
use crate::util::{aws_filter, decimal_from_f64, DEFAULT_VOLUME_SIZE};

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("aws_elasticsearch_domain", new_elasticsearch_domain)
}

fn new_elasticsearch_domain(d: ResourceRef<'_>, _u: Option<&UsageData>) -> Option<Resource> {
    let region = d.region();

    let instance_type = d.get_str("cluster_config.0.instance_type");
    let instance_count = match d.get_i64("cluster_config.0.instance_count") {
        0 => 1,
        n => n,
    };

    let volume_type = match d.get_str("ebs_options.0.volume_type") {
        "" => "gp2",
        t => t,
    };
    let storage_media = match volume_type {
        "io1" => "PIOPS-Storage",
        "standard" => "Magnetic",
        _ => "GP2",
    };
    let size = if d.exists("ebs_options.0.volume_size") {
        decimal_from_f64(d.get_f64("ebs_options.0.volume_size"))
    } else {
        Decimal::from(DEFAULT_VOLUME_SIZE)
    };
    let iops = decimal_from_f64(d.get_f64("ebs_options.0.iops")).max(Decimal::ONE);

    let mut resource = Resource::new(&d.address, &d.resource_type)
        .with_component(
            CostComponent::hourly(
                format!("Instance ({})", instance_type),
                "hours",
                Some(Decimal::from(instance_count)),
                aws_filter(region, "AmazonES", "Elastic Search Instance")
                    .attribute(AttributeFilter::regex("usagetype", "/ESInstance/"))
                    .attribute(AttributeFilter::exact("instanceType", instance_type)),
            )
            .with_price_filter(PriceFilter::on_demand()),
        )
        .with_component(
            CostComponent::monthly(
                "Storage",
                "GB-months",
                Some(size),
                aws_filter(region, "AmazonES", "Elastic Search Volume")
                    .attribute(AttributeFilter::regex("usagetype", "/ES.+-Storage/"))
                    .attribute(AttributeFilter::exact("storageMedia", storage_media)),
            )
            .with_price_filter(PriceFilter::on_demand()),
        );

    if volume_type == "io1" {
        resource = resource.with_component(
            CostComponent::monthly(
                "Storage IOPS",
                "IOPS-months",
                Some(iops),
                aws_filter(region, "AmazonES", "Elastic Search Volume")
                    .attribute(AttributeFilter::regex("usagetype", "/ES:PIOPS/"))
                    .attribute(AttributeFilter::exact("storageMedia", "PIOPS")),
            )
            .with_price_filter(PriceFilter::on_demand()),
        );
    }

    Some(resource)
}
