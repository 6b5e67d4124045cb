//! Integration tests for plan parsing.

use costgraph_plan::{parse_plan, Attributes, ResourceGraph, UsageFile};
use serde_json::{json, Value};

fn resource(address: &str, resource_type: &str, values: Value) -> Value {
    json!({
        "address": address,
        "type": resource_type,
        "provider_name": "aws",
        "values": values
    })
}

fn config(address: &str, expressions: Value) -> Value {
    json!({ "address": address, "expressions": expressions })
}

fn parse(plan: Value) -> ResourceGraph {
    parse_plan(plan.to_string().as_bytes()).unwrap().current
}

#[test]
fn test_counted_resources_resolve_per_index() {
    let plan = json!({
        "planned_values": {"root_module": {"resources": [
            resource("aws_instance.web[0]", "aws_instance", json!({})),
            resource("aws_instance.web[1]", "aws_instance", json!({})),
            resource("aws_eip.ip[0]", "aws_eip", json!({})),
            resource("aws_eip.ip[1]", "aws_eip", json!({}))
        ]}},
        "configuration": {"root_module": {"resources": [
            config("aws_instance.web", json!({
                "tags": {"Name": {"references": ["count.index"]}}
            })),
            config("aws_eip.ip", json!({
                "instance": {"references": ["aws_instance.web", "count.index"]}
            }))
        ]}}
    });

    let graph = parse(plan);
    assert_eq!(graph.len(), 4);

    for i in 0..2 {
        let eip = graph.get(&format!("aws_eip.ip[{}]", i)).unwrap();
        let targets = eip.references("instance");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].address, format!("aws_instance.web[{}]", i));
    }

    for r in graph.iter() {
        for targets in r.references.values() {
            assert!(targets.iter().all(|t| !t.contains("count.index")));
        }
    }
    assert!(graph.get("aws_instance.web[0]").unwrap().references.is_empty());
}

#[test]
fn test_reference_resolution_ignores_nesting_depth() {
    let module_resources = json!([
        resource("aws_instance.web", "aws_instance", json!({"instance_type": "t3.large"})),
        resource("aws_eip.ip", "aws_eip", json!({}))
    ]);
    let module_config = json!({"resources": [
        config("aws_instance.web", json!({})),
        config("aws_eip.ip", json!({"instance": {"references": ["aws_instance.web.id", "aws_instance.web"]}}))
    ]});

    let prefixed = |prefix: &str| -> Value {
        let resources: Vec<Value> = module_resources
            .as_array()
            .unwrap()
            .iter()
            .map(|r| {
                let mut r = r.clone();
                r["address"] = json!(format!("{}{}", prefix, r["address"].as_str().unwrap()));
                r
            })
            .collect();
        json!(resources)
    };

    let single = json!({
        "planned_values": {"root_module": {"child_modules": [
            {"address": "module.app", "resources": prefixed("module.app.")}
        ]}},
        "configuration": {"root_module": {"module_calls": {"app": {"module": module_config.clone()}}}}
    });
    let double = json!({
        "planned_values": {"root_module": {"child_modules": [
            {"address": "module.outer", "child_modules": [
                {"address": "module.outer.module.app", "resources": prefixed("module.outer.module.app.")}
            ]}
        ]}},
        "configuration": {"root_module": {"module_calls": {"outer": {"module": {
            "module_calls": {"app": {"module": module_config}}
        }}}}}
    });

    let single = parse(single);
    let double = parse(double);

    let a = single.get("module.app.aws_eip.ip").unwrap().reference("instance").unwrap();
    let b = double.get("module.outer.module.app.aws_eip.ip").unwrap().reference("instance").unwrap();

    assert_eq!(a.address, "module.app.aws_instance.web");
    assert_eq!(b.address, "module.outer.module.app.aws_instance.web");
    assert_eq!(a.get_str("instance_type"), b.get_str("instance_type"));
}

#[test]
fn test_dangling_reference_is_dropped() {
    let plan = json!({
        "planned_values": {"root_module": {"resources": [
            resource("aws_eip.ip", "aws_eip", json!({}))
        ]}},
        "configuration": {"root_module": {"resources": [
            config("aws_eip.ip", json!({"instance": {"references": ["module.missing.aws_instance.web"]}}))
        ]}}
    });

    let graph = parse(plan);
    let eip = graph.get("aws_eip.ip").unwrap();
    assert!(eip.references.is_empty());
    assert!(eip.references("instance").is_empty());
}

#[test]
fn test_usage_annotations_are_indexed_and_stripped() {
    let plan = json!({
        "planned_values": {"root_module": {"resources": [
            resource("aws_sqs_queue.orders", "aws_sqs_queue", json!({"fifo_queue": false})),
            {
                "address": "infracost_aws_sqs_queue.orders",
                "type": "infracost_aws_sqs_queue",
                "provider_name": "registry.terraform.io/infracost/infracost",
                "values": {"monthly_requests": [{"value": 5_000_000}]}
            }
        ]}},
        "configuration": {"root_module": {"resources": [
            config("aws_sqs_queue.orders", json!({})),
            config("infracost_aws_sqs_queue.orders", json!({
                "resources": {"references": ["aws_sqs_queue.orders.id", "aws_sqs_queue.orders"]}
            }))
        ]}}
    });

    let graph = parse(plan);
    assert_eq!(graph.len(), 1);
    assert!(!graph.contains("infracost_aws_sqs_queue.orders"));

    let queue = graph.get("aws_sqs_queue.orders").unwrap();
    assert_eq!(queue.usage().unwrap().get_i64("monthly_requests"), 5_000_000);
}

#[test]
fn test_usage_file_overrides_annotations() {
    let plan = json!({
        "planned_values": {"root_module": {"resources": [
            resource("aws_sqs_queue.orders", "aws_sqs_queue", json!({}))
        ]}}
    });
    let mut graph = parse(plan);

    let yaml = "version: 0.1\nresource_usage:\n  aws_sqs_queue.orders:\n    monthly_requests: 42\n";
    graph.merge_usage(UsageFile::from_yaml(yaml).unwrap().into_usage().unwrap());

    assert_eq!(graph.usage("aws_sqs_queue.orders").unwrap().get_i64("monthly_requests"), 42);
}

#[test]
fn test_region_from_arn_and_provider() {
    let plan = json!({
        "planned_values": {"root_module": {"resources": [
            resource("aws_kms_key.k", "aws_kms_key", json!({"arn": "arn:aws:kms:eu-west-1:123456789012:key/abc"})),
            resource("aws_eip.ip", "aws_eip", json!({}))
        ]}},
        "configuration": {
            "provider_config": {"aws": {"expressions": {"region": {"constant_value": "us-west-2"}}}},
            "root_module": {}
        }
    });

    let graph = parse(plan);
    assert_eq!(graph.get("aws_kms_key.k").unwrap().region(), "eu-west-1");
    assert_eq!(graph.get("aws_eip.ip").unwrap().region(), "us-west-2");
}

#[test]
fn test_prior_state_builds_past_graph() {
    let plan = json!({
        "prior_state": {"values": {"root_module": {"resources": [
            resource("aws_ebs_volume.data", "aws_ebs_volume", json!({"size": 10}))
        ]}}},
        "planned_values": {"root_module": {"resources": [
            resource("aws_ebs_volume.data", "aws_ebs_volume", json!({"size": 20}))
        ]}}
    });

    let parsed = parse_plan(plan.to_string().as_bytes()).unwrap();
    let past = parsed.past.unwrap();
    assert_eq!(past.get("aws_ebs_volume.data").unwrap().get_i64("size"), 10);
    assert_eq!(parsed.current.get("aws_ebs_volume.data").unwrap().get_i64("size"), 20);
}
