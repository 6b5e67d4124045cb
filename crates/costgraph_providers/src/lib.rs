//! # costgraph_providers
//!
//! Cost models for cloud resource types and the registry that dispatches
//! plan records to them.
//!
//! Each supported type has a constructor that turns a resource record and
//! its optional usage into a [`Resource`](costgraph_schema::Resource) with
//! unpriced cost components. Types known to be free of charge produce a
//! no-price node; everything else is reported as unsupported.

pub mod aws;
pub mod azure;
pub mod error;
pub mod registry;
pub mod util;

#[cfg(test)]
mod test_util;

pub use error::{ProviderError, ProviderResult};
pub use registry::{RegistryItem, ResourceFunc, ResourceRegistry};

/// A registry with every built-in AWS and Azure cost model.
pub fn default_registry() -> ResourceRegistry {
    let mut registry = ResourceRegistry::new();
    for item in aws::registry_items().into_iter().chain(azure::registry_items()) {
        registry.register(item);
    }
    registry.register_free(aws::FREE_RESOURCES.iter().copied());
    registry.register_free(azure::FREE_RESOURCES.iter().copied());
    registry
}
