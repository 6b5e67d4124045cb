//! Azure managed disk pricing shared by virtual machine OS disks.

use costgraph_schema::{AttributeFilter, CostComponent, PriceFilter, Resource};
use rust_decimal::Decimal;

use crate::util::azure_filter;

/// Size used when an OS disk does not declare one.
pub(crate) const DEFAULT_OS_DISK_SIZE: i64 = 30;

const DISK_SIZES: &[(&str, i64)] = &[
    ("1", 4),
    ("2", 8),
    ("3", 16),
    ("4", 32),
    ("6", 64),
    ("10", 128),
    ("15", 256),
    ("20", 512),
    ("30", 1024),
    ("40", 2048),
    ("50", 4096),
    ("60", 8192),
    ("70", 16384),
    ("80", 32767),
];

struct DiskKind {
    prefix: &'static str,
    product_name: &'static str,
    billed_operations: bool,
}

fn disk_kind(storage_account_type: &str) -> DiskKind {
    match storage_account_type.split('_').next().unwrap_or_default() {
        "Premium" => DiskKind {
            prefix: "P",
            product_name: "Premium SSD Managed Disks",
            billed_operations: false,
        },
        "StandardSSD" => DiskKind {
            prefix: "E",
            product_name: "Standard SSD Managed Disks",
            billed_operations: true,
        },
        _ => DiskKind {
            prefix: "S",
            product_name: "Standard HDD Managed Disks",
            billed_operations: true,
        },
    }
}

/// Smallest disk tier that fits `size_gb`; oversized disks get the largest tier.
/// Standard HDD tiers start at S4.
fn disk_tier(prefix: &str, size_gb: i64) -> String {
    let tiers = DISK_SIZES
        .iter()
        .filter(|(name, _)| prefix != "S" || name.parse::<i64>().unwrap_or_default() >= 4);

    let mut chosen = "80";
    for (name, size) in tiers {
        if size_gb <= *size {
            chosen = *name;
            break;
        }
    }
    format!("{}{}", prefix, chosen)
}

/// A managed disk node with a storage component and, for standard disks,
/// a disk operations component.
pub(crate) fn managed_disk(
    name: &str,
    region: &str,
    storage_account_type: &str,
    size_gb: i64,
    monthly_operations: Option<Decimal>,
) -> Resource {
    let kind = disk_kind(storage_account_type);
    let tier = disk_tier(kind.prefix, size_gb);
    let redundancy = match storage_account_type.split('_').nth(1) {
        Some("ZRS") => "ZRS",
        _ => "LRS",
    };

    let mut resource = Resource::new(name, "").with_component(
        CostComponent::monthly(
            format!("Storage ({})", tier),
            "months",
            Some(Decimal::ONE),
            azure_filter(region, "Storage", "Storage")
                .attribute(AttributeFilter::exact("productName", kind.product_name))
                .attribute(AttributeFilter::exact("skuName", format!("{} {}", tier, redundancy)))
                .attribute(AttributeFilter::regex("meterName", format!("/{} (LRS|ZRS) Disk$/", tier))),
        )
        .with_price_filter(PriceFilter::purchase_option("Consumption")),
    );

    if kind.billed_operations {
        resource = resource.with_component(
            CostComponent::monthly(
                "Disk operations",
                "10k operations",
                monthly_operations,
                azure_filter(region, "Storage", "Storage")
                    .attribute(AttributeFilter::exact("productName", kind.product_name))
                    .attribute(AttributeFilter::regex("meterName", "/Disk Operations$/")),
            )
            .with_unit_multiplier(Decimal::new(1, 4))
            .with_price_filter(PriceFilter::purchase_option("Consumption")),
        );
    }

    resource
}
