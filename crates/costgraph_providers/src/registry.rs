//! Resource registry mapping resource types to cost model constructors.

use std::collections::{BTreeSet, HashMap};

use costgraph_plan::{address, ResourceGraph, ResourceRef, UsageData};
use costgraph_schema::Resource;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// Builds a cost model node from a resource record and its optional usage.
///
/// Returning `None` marks the configuration as not costable; the record is
/// then reported as skipped.
pub type ResourceFunc = fn(ResourceRef<'_>, Option<&UsageData>) -> Option<Resource>;

pub const UNSUPPORTED_MESSAGE: &str = "This resource is not currently supported";
pub const UNSUPPORTED_CONFIGURATION_MESSAGE: &str = "This resource configuration is not currently supported";

/// One supported resource type.
pub struct RegistryItem {
    pub name: &'static str,
    pub rfunc: ResourceFunc,
    pub notes: &'static [&'static str],
}

impl RegistryItem {
    pub const fn new(name: &'static str, rfunc: ResourceFunc) -> Self {
        Self { name, rfunc, notes: &[] }
    }

    pub const fn with_notes(mut self, notes: &'static [&'static str]) -> Self {
        self.notes = notes;
        self
    }
}

impl std::fmt::Debug for RegistryItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryItem")
            .field("name", &self.name)
            .field("notes", &self.notes)
            .finish()
    }
}

/// A registry of cost model constructors keyed by resource type.
#[derive(Default)]
pub struct ResourceRegistry {
    items: HashMap<&'static str, RegistryItem>,
    free: BTreeSet<&'static str>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor, replacing any existing one for the same type.
    pub fn register(&mut self, item: RegistryItem) {
        debug!("Registering resource type: {}", item.name);
        self.items.insert(item.name, item);
    }

    /// Mark resource types as free of charge.
    pub fn register_free(&mut self, types: impl IntoIterator<Item = &'static str>) {
        self.free.extend(types);
    }

    /// Get a registered constructor by type.
    pub fn get(&self, resource_type: &str) -> Option<&RegistryItem> {
        self.items.get(resource_type)
    }

    /// Get a constructor, failing if the type is unknown.
    pub fn get_required(&self, resource_type: &str) -> ProviderResult<&RegistryItem> {
        self.get(resource_type)
            .ok_or_else(|| ProviderError::UnknownResourceType(resource_type.to_string()))
    }

    /// Check if a type has a constructor.
    pub fn contains(&self, resource_type: &str) -> bool {
        self.items.contains_key(resource_type)
    }

    /// Check if a type is free of charge.
    pub fn is_free(&self, resource_type: &str) -> bool {
        self.free.contains(resource_type)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.items.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dispatch one record to its constructor.
    ///
    /// Free types yield a no-price node; unknown types yield a skipped node.
    pub fn create_resource(&self, data: ResourceRef<'_>, usage: Option<&UsageData>) -> Resource {
        if let Some(item) = self.get(&data.resource_type) {
            let resource = match (item.rfunc)(data, usage) {
                Some(resource) => resource,
                None => {
                    debug!("Skipping {}: unsupported configuration", data.address);
                    Resource::skipped(&data.address, &data.resource_type, UNSUPPORTED_CONFIGURATION_MESSAGE)
                }
            };
            return Resource {
                resource_type: data.resource_type.clone(),
                ..resource
            };
        }

        if self.is_free(&data.resource_type) {
            return Resource::free(&data.address, &data.resource_type);
        }

        debug!("Skipping {}: type {} is not supported", data.address, data.resource_type);
        Resource::skipped(&data.address, &data.resource_type, UNSUPPORTED_MESSAGE)
    }

    /// Build the cost model forest of a graph, in address order.
    /// Data sources are not costed.
    pub fn build_resources(&self, graph: &ResourceGraph) -> Vec<Resource> {
        graph
            .iter()
            .filter(|r| !address::is_data_source(&r.address))
            .map(|r| self.create_resource(r, r.usage()))
            .collect()
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("items", &self.names())
            .field("free", &self.free.len())
            .finish()
    }
}
