use costgraph_plan::{ResourceData, ResourceGraph};
use serde_json::{json, Value};

/// A graph holding a single record.
pub(crate) fn graph_with(resource_type: &str, address: &str, values: Value) -> ResourceGraph {
    let mut graph = ResourceGraph::new();
    graph.insert(ResourceData::new(resource_type, "test", address, values));
    graph
}

/// A graph holding a record whose `resource_group_name` refers to a
/// resource group in `location`.
pub(crate) fn graph_with_resource_group(
    resource_type: &str,
    address: &str,
    values: Value,
    location: &str,
) -> ResourceGraph {
    let mut data = ResourceData::new(resource_type, "test", address, values);
    data.add_reference("resource_group_name", "azurerm_resource_group.rg");

    let mut graph = ResourceGraph::new();
    graph.insert(ResourceData::new(
        "azurerm_resource_group",
        "test",
        "azurerm_resource_group.rg",
        json!({"location": location}),
    ));
    graph.insert(data);
    graph
}
