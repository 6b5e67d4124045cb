//! Resource records, usage data and the resource graph.

use std::collections::{BTreeMap, HashMap};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed, default-on-absence access to a semi-structured attribute document.
///
/// Paths are dotted; numeric segments index into arrays, so
/// `root_block_device.0.volume_size` reads the first nested block.
pub trait Attributes {
    fn raw_values(&self) -> &Value;

    fn get(&self, path: &str) -> Option<&Value> {
        lookup(self.raw_values(), path).filter(|v| !v.is_null())
    }

    fn exists(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// String value at `path`, or `""` when absent or not a string.
    fn get_str(&self, path: &str) -> &str {
        self.get(path).and_then(Value::as_str).unwrap_or_default()
    }

    /// Numeric value at `path`, or `0.0`. Numeric strings are parsed.
    fn get_f64(&self, path: &str) -> f64 {
        self.get(path).and_then(value_as_f64).unwrap_or_default()
    }

    /// Integer value at `path`, or `0`. Fractions are truncated.
    fn get_i64(&self, path: &str) -> i64 {
        match self.get(path) {
            Some(v) => v.as_i64().or_else(|| value_as_f64(v).map(|f| f as i64)).unwrap_or_default(),
            None => 0,
        }
    }

    fn get_bool(&self, path: &str) -> bool {
        self.get(path).and_then(Value::as_bool).unwrap_or_default()
    }

    /// Array elements at `path`, or an empty slice.
    fn get_array(&self, path: &str) -> &[Value] {
        self.get(path).and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Walk a dotted path through nested objects and arrays.
pub fn lookup<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return Some(root);
    }

    path.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn value_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// One planned infrastructure object.
///
/// `references` maps an attribute path to the addresses of the records it
/// points at. They are lookups into the owning [`ResourceGraph`], not owned
/// data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    pub resource_type: String,
    pub provider_name: String,
    pub address: String,
    pub values: Value,
    pub references: BTreeMap<String, Vec<String>>,
}

impl ResourceData {
    pub fn new(
        resource_type: impl Into<String>,
        provider_name: impl Into<String>,
        address: impl Into<String>,
        values: Value,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            provider_name: provider_name.into(),
            address: address.into(),
            values,
            references: BTreeMap::new(),
        }
    }

    /// Set a top-level value, turning non-object values into an object first.
    pub fn set_value(&mut self, key: &str, value: Value) {
        if !self.values.is_object() {
            self.values = Value::Object(Default::default());
        }
        if let Value::Object(map) = &mut self.values {
            map.insert(key.to_string(), value);
        }
    }

    pub fn add_reference(&mut self, attribute: impl Into<String>, target: impl Into<String>) {
        let targets = self.references.entry(attribute.into()).or_default();
        let target = target.into();
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    pub fn region(&self) -> &str {
        self.get_str("region")
    }
}

impl Attributes for ResourceData {
    fn raw_values(&self) -> &Value {
        &self.values
    }
}

/// Usage estimates for one resource address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageData {
    pub address: String,
    pub values: Value,
}

impl UsageData {
    pub fn new(address: impl Into<String>, values: Value) -> Self {
        Self {
            address: address.into(),
            values,
        }
    }

    /// Build usage data from the values of an annotation record.
    ///
    /// Annotation attributes are written as nested blocks, e.g.
    /// `monthly_requests = [{ value = 100 }]`, and are flattened to
    /// `monthly_requests: 100`. The `resources` attribute is dropped.
    pub fn from_annotation(address: impl Into<String>, values: &Value) -> Self {
        let mut flat = serde_json::Map::new();

        if let Value::Object(map) = values {
            for (key, value) in map {
                if key == "resources" {
                    continue;
                }
                flat.insert(key.clone(), unwrap_value_block(value));
            }
        }

        Self::new(address, Value::Object(flat))
    }

    /// Merge another set of values over this one; `other` wins on conflicts.
    pub fn merge(&mut self, other: &UsageData) {
        let Value::Object(incoming) = &other.values else {
            return;
        };
        if !self.values.is_object() {
            self.values = Value::Object(Default::default());
        }
        if let Value::Object(map) = &mut self.values {
            for (k, v) in incoming {
                map.insert(k.clone(), v.clone());
            }
        }
    }
}

impl Attributes for UsageData {
    fn raw_values(&self) -> &Value {
        &self.values
    }
}

fn unwrap_value_block(value: &Value) -> Value {
    if let Value::Array(items) = value {
        if let [Value::Object(block)] = items.as_slice() {
            if let Some(inner) = block.get("value") {
                return inner.clone();
            }
        }
    }
    value.clone()
}

/// Address-keyed resource records plus usage annotations.
///
/// Records are kept sorted by address so that iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    resources: BTreeMap<String, ResourceData>,
    usage: HashMap<String, UsageData>,
}

impl ResourceGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record; an existing record with the same address is replaced.
    pub fn insert(&mut self, data: ResourceData) {
        self.resources.insert(data.address.clone(), data);
    }

    /// Remove a record by address.
    pub fn remove(&mut self, address: &str) -> Option<ResourceData> {
        self.resources.remove(address)
    }

    /// Check if a record exists.
    pub fn contains(&self, address: &str) -> bool {
        self.resources.contains_key(address)
    }

    /// Look up a record as a graph view.
    pub fn get(&self, address: &str) -> Option<ResourceRef<'_>> {
        self.resources.get(address).map(|data| ResourceRef { data, graph: self })
    }

    pub(crate) fn get_mut(&mut self, address: &str) -> Option<&mut ResourceData> {
        self.resources.get_mut(address)
    }

    /// All addresses, sorted.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Iterate records in address order.
    pub fn iter(&self) -> impl Iterator<Item = ResourceRef<'_>> {
        self.resources.values().map(move |data| ResourceRef { data, graph: self })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if the graph has no records.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Usage data attached to an address.
    pub fn usage(&self, address: &str) -> Option<&UsageData> {
        self.usage.get(address)
    }

    /// Number of usage entries.
    pub fn usage_len(&self) -> usize {
        self.usage.len()
    }

    /// Attach usage data, replacing any existing entry.
    pub fn set_usage(&mut self, usage: UsageData) {
        self.usage.insert(usage.address.clone(), usage);
    }

    /// Merge usage entries into the graph, overriding keys already present.
    pub fn merge_usage(&mut self, usage: impl IntoIterator<Item = UsageData>) {
        for entry in usage {
            match self.usage.get_mut(&entry.address) {
                Some(existing) => existing.merge(&entry),
                None => self.set_usage(entry),
            }
        }
    }
}

/// A record viewed through the graph that owns it.
#[derive(Debug, Clone, Copy)]
pub struct ResourceRef<'g> {
    data: &'g ResourceData,
    graph: &'g ResourceGraph,
}

impl<'g> ResourceRef<'g> {
    pub fn data(&self) -> &'g ResourceData {
        self.data
    }

    /// Records referenced from `attribute`, in reference order.
    pub fn references(&self, attribute: &str) -> Vec<ResourceRef<'g>> {
        let graph = self.graph;
        self.data
            .references
            .get(attribute)
            .map(|targets| targets.iter().filter_map(|t| graph.get(t)).collect())
            .unwrap_or_default()
    }

    /// The first record referenced from `attribute`.
    pub fn reference(&self, attribute: &str) -> Option<ResourceRef<'g>> {
        let target = self.data.references.get(attribute)?.first()?;
        self.graph.get(target)
    }

    pub fn usage(&self) -> Option<&'g UsageData> {
        self.graph.usage(&self.data.address)
    }
}

impl Deref for ResourceRef<'_> {
    type Target = ResourceData;

    fn deref(&self) -> &ResourceData {
        self.data
    }
}
