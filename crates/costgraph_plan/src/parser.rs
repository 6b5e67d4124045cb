//! Plan JSON parsing into a [`ResourceGraph`].
//!
//! The graph is built in three passes over the plan document:
//!
//! 1. Walk `planned_values.root_module` and its `child_modules`, creating one
//!    [`ResourceData`] per resource with an inferred `region` value.
//! 2. Walk the parallel `configuration.root_module` tree, collect the
//!    references of every expression and resolve them against the records
//!    created in pass 1. Unresolvable references are dropped.
//! 3. Index usage annotations by the records they point at and remove them
//!    from the graph.
//!
//! When the plan carries `prior_state`, the same passes build a second graph
//! for the past snapshot.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::address::{count_index, module_names, module_part, resource_part, strip_index};
use crate::data::{lookup, ResourceData, ResourceGraph, UsageData};
use crate::error::PlanResult;

/// Provider names used by usage annotation resources across Terraform versions.
pub const USAGE_PROVIDER_NAMES: &[&str] = &[
    "infracost",
    "infracost.io/infracost/infracost",
    "registry.terraform.io/infracost/infracost",
];

/// Region used when neither the resource nor the provider names one.
pub const DEFAULT_REGION: &str = "us-east-1";

const COUNT_INDEX: &str = "count.index";

/// The graphs parsed from one plan document.
#[derive(Debug, Clone, Default)]
pub struct ParsedPlan {
    pub current: ResourceGraph,
    /// Present when the plan was generated against existing state.
    pub past: Option<ResourceGraph>,
}

/// Parse a plan JSON document.
pub fn parse_plan(bytes: &[u8]) -> PlanResult<ParsedPlan> {
    let plan = Value::Object(serde_json::from_slice(bytes)?);

    let default_region = provider_region(&plan);
    let configuration = lookup(&plan, "configuration.root_module");
    debug!("Parsing plan with default region {}", default_region);

    let current = match lookup(&plan, "planned_values.root_module") {
        Some(root) => build_graph(root, configuration, &default_region),
        None => ResourceGraph::new(),
    };
    let past = lookup(&plan, "prior_state.values.root_module")
        .map(|root| build_graph(root, configuration, &default_region));

    debug!(
        "Parsed {} current resources ({} with usage), prior state: {}",
        current.len(),
        current.usage_len(),
        past.as_ref().map(ResourceGraph::len).unwrap_or_default()
    );

    Ok(ParsedPlan { current, past })
}

/// Build a graph from one module tree of a plan.
pub fn build_graph(root: &Value, configuration: Option<&Value>, default_region: &str) -> ResourceGraph {
    let mut graph = ResourceGraph::new();
    collect_resources(root, default_region, &mut graph);
    if let Some(configuration) = configuration {
        resolve_references(&mut graph, configuration);
    }
    extract_usage(&mut graph);
    graph
}

pub fn is_usage_annotation(data: &ResourceData) -> bool {
    USAGE_PROVIDER_NAMES.contains(&data.provider_name.as_str())
}

fn provider_region(plan: &Value) -> String {
    lookup(plan, "configuration.provider_config.aws.expressions.region.constant_value")
        .and_then(Value::as_str)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_REGION)
        .to_string()
}

/// Region segment of an ARN, e.g. `arn:aws:sqs:eu-west-1:123:q` gives `eu-west-1`.
fn arn_region(values: &Value) -> Option<&str> {
    let arn = values.get("arn")?.as_str()?;
    arn.split(':').nth(3).filter(|r| !r.is_empty())
}

fn collect_resources(module: &Value, default_region: &str, graph: &mut ResourceGraph) {
    let entries = module.get("resources").and_then(Value::as_array).into_iter().flatten();

    for entry in entries {
        let field = |key: &str| entry.get(key).and_then(Value::as_str).unwrap_or_default();

        let values = match entry.get("values") {
            Some(v @ Value::Object(_)) => v.clone(),
            _ => Value::Object(Default::default()),
        };
        let region = arn_region(&values).unwrap_or(default_region).to_string();

        let mut data = ResourceData::new(field("type"), field("provider_name"), field("address"), values);
        data.set_value("region", Value::String(region));
        graph.insert(data);
    }

    let children = module.get("child_modules").and_then(Value::as_array).into_iter().flatten();
    for child in children {
        collect_resources(child, default_region, graph);
    }
}

/// Locate the configuration block of a resource by following its module path.
fn resource_configuration<'c>(configuration: &'c Value, address: &str) -> Option<&'c Value> {
    let mut module = configuration;
    for name in module_names(address) {
        module = module.get("module_calls")?.get(&name)?.get("module")?;
    }

    let part = resource_part(address);
    let wanted = strip_index(&part);

    module
        .get("resources")?
        .as_array()?
        .iter()
        .find(|r| r.get("address").and_then(Value::as_str) == Some(wanted))
}

/// Collect attribute path to reference list pairs from an expression tree.
fn collect_references(attribute: &str, expression: &Value, refs: &mut BTreeMap<String, Vec<String>>) {
    match expression {
        Value::Object(map) => match map.get("references").and_then(Value::as_array) {
            Some(list) => {
                let entry = refs.entry(attribute.to_string()).or_default();
                entry.extend(list.iter().filter_map(Value::as_str).map(str::to_string));
            }
            None => {
                for (key, child) in map {
                    collect_references(&format!("{}.{}", attribute, key), child, refs);
                }
            }
        },
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_references(&format!("{}.{}", attribute, i), item, refs);
            }
        }
        _ => {}
    }
}

fn resolve_references(graph: &mut ResourceGraph, configuration: &Value) {
    let mut resolved: Vec<(String, String, String)> = Vec::new();

    for source in graph.iter() {
        let Some(config) = resource_configuration(configuration, &source.address) else {
            continue;
        };

        let mut refs = BTreeMap::new();
        if let Some(Value::Object(expressions)) = config.get("expressions") {
            for (attribute, expression) in expressions {
                collect_references(attribute, expression, &mut refs);
            }
        }

        let prefix = module_part(&source.address);
        let index = count_index(&source.address);

        for (attribute, targets) in refs {
            let counted = targets.iter().any(|r| r == COUNT_INDEX);

            for reference in targets.iter().filter(|r| *r != COUNT_INDEX) {
                let target = match index {
                    Some(i) if counted => format!("{}{}[{}]", prefix, reference, i),
                    _ => format!("{}{}", prefix, reference),
                };

                if graph.contains(&target) {
                    resolved.push((source.address.clone(), attribute.clone(), target));
                }
            }
        }
    }

    debug!("Resolved {} references", resolved.len());

    for (source, attribute, target) in resolved {
        if let Some(data) = graph.get_mut(&source) {
            data.add_reference(attribute, target);
        }
    }
}

fn extract_usage(graph: &mut ResourceGraph) {
    let annotations: Vec<String> = graph
        .iter()
        .filter(|r| is_usage_annotation(r))
        .map(|r| r.address.clone())
        .collect();

    for address in annotations {
        let Some(annotation) = graph.remove(&address) else {
            continue;
        };

        let targets = annotation.references.get("resources").cloned().unwrap_or_default();
        debug!("Usage annotation {} applies to {:?}", address, targets);

        let usage = targets
            .into_iter()
            .map(|target| UsageData::from_annotation(target, &annotation.values));
        graph.merge_usage(usage);
    }
}
