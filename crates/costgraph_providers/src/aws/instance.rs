use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, PriceFilter, Resource};
use rust_decimal::Decimal;
use serde_json::Value;

use super::ebs_volume::ebs_volume_cost_components;
use crate::registry::RegistryItem;
use crate::util::{aws_filter, decimal_from_f64, usage_decimal, DEFAULT_VOLUME_SIZE};

/// Metrics billed for detailed monitoring of one instance.
const DETAILED_MONITORING_METRICS: i64 = 7;

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("aws_instance", new_instance).with_notes(&[
        "Costs associated with non-standard AMIs, such as Windows and RHEL, are not supported.",
        "Savings plans and reserved instances are not supported.",
    ])
}

fn new_instance(d: ResourceRef<'_>, u: Option<&UsageData>) -> Option<Resource> {
    let region = d.region();
    let instance_type = d.get_str("instance_type");
    let tenancy = match d.get_str("tenancy") {
        "dedicated" => "Dedicated",
        "host" => "Host",
        _ => "Shared",
    };

    let mut resource = Resource::new(&d.address, &d.resource_type).with_component(
        CostComponent::hourly(
            format!("Instance usage (Linux/UNIX, on-demand, {})", instance_type),
            "hours",
            Some(Decimal::ONE),
            aws_filter(region, "AmazonEC2", "Compute Instance")
                .attribute(AttributeFilter::exact("instanceType", instance_type))
                .attribute(AttributeFilter::exact("tenancy", tenancy))
                .attribute(AttributeFilter::exact("operatingSystem", "Linux"))
                .attribute(AttributeFilter::exact("preInstalledSw", "NA"))
                .attribute(AttributeFilter::exact("capacitystatus", "Used")),
        )
        .with_price_filter(PriceFilter::on_demand()),
    );

    if d.get_bool("ebs_optimized") {
        resource = resource.with_component(
            CostComponent::hourly(
                "EBS-optimized usage",
                "hours",
                Some(Decimal::ONE),
                aws_filter(region, "AmazonEC2", "Compute Instance")
                    .attribute(AttributeFilter::exact("instanceType", instance_type))
                    .attribute(AttributeFilter::regex("usagetype", "/EBSOptimized:/")),
            )
            .with_price_filter(PriceFilter::on_demand()),
        );
    }

    if d.get_bool("monitoring") {
        resource = resource.with_component(CostComponent::monthly(
            "EC2 detailed monitoring",
            "metrics",
            Some(Decimal::from(DETAILED_MONITORING_METRICS)),
            aws_filter(region, "AmazonCloudWatch", "Metric")
                .attribute(AttributeFilter::regex("usagetype", "/CW:MetricMonitorUsage/")),
        )
        .with_price_filter(PriceFilter::on_demand().with_start_usage_amount("0")));
    }

    if let Some(credits) = cpu_credits(d, u, region) {
        resource = resource.with_component(credits);
    }

    let root = d.get_array("root_block_device").first();
    resource = resource.with_sub_resource(block_device("root_block_device", region, root));

    for (i, device) in d.get_array("ebs_block_device").iter().enumerate() {
        let name = match device.get("device_name").and_then(Value::as_str) {
            Some(device_name) => format!("ebs_block_device[{}] ({})", i, device_name),
            None => format!("ebs_block_device[{}]", i),
        };
        resource = resource.with_sub_resource(block_device(&name, region, Some(device)));
    }

    Some(resource)
}

/// Burstable instances in unlimited mode pay for surplus CPU credits.
fn cpu_credits(d: ResourceRef<'_>, u: Option<&UsageData>, region: &str) -> Option<CostComponent> {
    let instance_type = d.get_str("instance_type");
    let family = instance_type.split('.').next().unwrap_or_default();
    if !matches!(family, "t2" | "t3" | "t3a" | "t4g") {
        return None;
    }

    let default_mode = if family == "t2" { "standard" } else { "unlimited" };
    let mode = match d.get_str("credit_specification.0.cpu_credits") {
        "" => default_mode,
        m => m,
    };
    if mode != "unlimited" {
        return None;
    }

    let usage_type = if family == "t2" { "/CPUCredits:t2/" } else { "/CPUCredits:t3/" };
    Some(
        CostComponent::monthly(
            "CPU credits",
            "vCPU-hours",
            usage_decimal(u, "cpu_credit_hrs"),
            aws_filter(region, "AmazonEC2", "CPU Credits")
                .attribute(AttributeFilter::exact("operatingSystem", "Linux"))
                .attribute(AttributeFilter::regex("usagetype", usage_type)),
        )
        .with_price_filter(PriceFilter::on_demand()),
    )
}

fn block_device(name: &str, region: &str, device: Option<&Value>) -> Resource {
    let field = |key: &str| device.and_then(|v| v.get(key)).filter(|v| !v.is_null());

    let volume_type = field("volume_type").and_then(Value::as_str).unwrap_or("gp2");
    let size = field("volume_size")
        .and_then(Value::as_f64)
        .map(decimal_from_f64)
        .unwrap_or_else(|| Decimal::from(DEFAULT_VOLUME_SIZE));
    let iops = field("iops").and_then(Value::as_f64).map(decimal_from_f64).unwrap_or_default();

    Resource::new(name, "").with_components(ebs_volume_cost_components(region, volume_type, size, iops))
}
