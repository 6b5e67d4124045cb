//! Integration tests for the cost model.

use costgraph_schema::{
    calculate_diff, calculate_totals, CostComponent, PriceFilter, ProductFilter, Project, Resource, Root,
};
use rust_decimal::Decimal;

fn ebs_volume(name: &str, size_gb: i64) -> Resource {
    let mut storage = CostComponent::monthly(
        "General Purpose SSD storage (gp2)",
        "GB-months",
        Some(Decimal::from(size_gb)),
        ProductFilter::new("aws").region("us-east-1").service("AmazonEC2").product_family("Storage"),
    )
    .with_price_filter(PriceFilter::on_demand());
    storage.set_price(Decimal::new(10, 2));

    Resource::new(name, "aws_ebs_volume").with_component(storage)
}

fn instance(name: &str, price: Decimal) -> Resource {
    let mut usage = CostComponent::hourly(
        "Linux/UNIX usage (on-demand, t3.medium)",
        "hours",
        Some(Decimal::ONE),
        ProductFilter::new("aws").region("us-east-1").service("AmazonEC2"),
    );
    usage.set_price(price);

    Resource::new(name, "aws_instance")
        .with_component(usage)
        .with_sub_resource(ebs_volume("root_block_device", 8))
}

#[test]
fn test_totals_over_forest() {
    let resources = vec![
        instance("aws_instance.web", Decimal::new(416, 4)),
        ebs_volume("aws_ebs_volume.data", 100),
        Resource::free("aws_vpc.main", "aws_vpc"),
    ];

    let totals = calculate_totals(&resources);
    // 0.0416 * 730 + 8 * 0.10 + 100 * 0.10
    assert_eq!(totals.monthly_cost, Decimal::new(41168, 3));
}

#[test]
fn test_identical_forests_do_not_change() {
    let past = vec![instance("aws_instance.web", Decimal::new(416, 4))];
    let current = past.clone();

    let diff = calculate_diff(&past, &current);
    assert!(!diff.changed);
    assert_eq!(diff.total_monthly_cost(), Decimal::ZERO);
    assert_eq!(diff.resources[0].sub_resources[0].name, "root_block_device");
}

#[test]
fn test_resize_shows_in_sub_resource() {
    let past = vec![instance("aws_instance.web", Decimal::new(416, 4))];
    let mut current = past.clone();
    current[0].sub_resources[0] = ebs_volume("root_block_device", 20);

    let diff = calculate_diff(&past, &current);
    assert!(diff.changed);

    let sub = &diff.resources[0].sub_resources[0];
    assert_eq!(sub.monthly_cost, Decimal::new(12, 1));
    assert_eq!(sub.cost_components[0].monthly_quantity, Decimal::from(12));
    assert_eq!(diff.resources[0].monthly_cost, Decimal::new(12, 1));
}

#[test]
fn test_added_and_removed_resources() {
    let past = vec![ebs_volume("aws_ebs_volume.old", 50)];
    let current = vec![ebs_volume("aws_ebs_volume.new", 30)];

    let diff = calculate_diff(&past, &current);
    let names: Vec<&str> = diff.resources.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["aws_ebs_volume.new", "aws_ebs_volume.old"]);
    assert_eq!(diff.resources[0].monthly_cost, Decimal::from(3));
    assert_eq!(diff.resources[1].monthly_cost, Decimal::from(-5));
    assert_eq!(diff.total_monthly_cost(), Decimal::from(-2));
}

#[test]
fn test_project_output_round_trip() {
    let mut project = Project::new("main").with_metadata("path", "plan.json");
    project.past_resources = vec![ebs_volume("aws_ebs_volume.data", 10)];
    project.resources = vec![ebs_volume("aws_ebs_volume.data", 20)];
    project.calculate_diff();

    let root = Root::from_projects(&[project]);
    let json = root.to_json().unwrap();
    let parsed: Root = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.projects[0].name, "main");
    assert_eq!(parsed.totals.monthly_cost, Decimal::from(2));
    let diff = parsed.projects[0].diff.as_ref().unwrap();
    assert!(diff.changed);
    assert_eq!(diff.total_monthly_cost(), Decimal::ONE);
}
