//! A single evaluated plan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::costs::{calculate_totals, CostTotals};
use crate::diff::{calculate_diff, Diff};
use crate::resource::Resource;

/// Counts of supported, unsupported and free resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    pub supported_counts: BTreeMap<String, usize>,
    pub unsupported_counts: BTreeMap<String, usize>,
    pub total_supported: usize,
    pub total_unsupported: usize,
    pub total_no_price: usize,
    pub total: usize,
}

impl ResourceSummary {
    /// Classify top-level resources by how they were costed.
    pub fn from_resources(resources: &[Resource]) -> Self {
        let mut summary = Self::default();

        for r in resources {
            summary.total += 1;

            if r.no_price {
                summary.total_no_price += 1;
            } else if r.is_skipped {
                summary.total_unsupported += 1;
                *summary.unsupported_counts.entry(r.resource_type.clone()).or_default() += 1;
            } else {
                summary.total_supported += 1;
                *summary.supported_counts.entry(r.resource_type.clone()).or_default() += 1;
            }
        }

        summary
    }

    /// Merge another summary into this one.
    pub fn add(&mut self, other: &ResourceSummary) {
        for (k, v) in &other.supported_counts {
            *self.supported_counts.entry(k.clone()).or_default() += v;
        }
        for (k, v) in &other.unsupported_counts {
            *self.unsupported_counts.entry(k.clone()).or_default() += v;
        }
        self.total_supported += other.total_supported;
        self.total_unsupported += other.total_unsupported;
        self.total_no_price += other.total_no_price;
        self.total += other.total;
    }
}

/// One plan evaluation: a past forest, a current forest and their diff.
///
/// The past forest is empty unless the plan carried a prior state.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub name: String,
    pub past_resources: Vec<Resource>,
    pub resources: Vec<Resource>,
    pub diff: Option<Diff>,
    pub metadata: BTreeMap<String, String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Compute and store the diff between the past and current forests.
    pub fn calculate_diff(&mut self) -> &Diff {
        debug!(
            "Calculating diff for {} ({} past, {} current resources)",
            self.name,
            self.past_resources.len(),
            self.resources.len()
        );
        self.diff.insert(calculate_diff(&self.past_resources, &self.resources))
    }

    pub fn has_diff(&self) -> bool {
        self.diff.as_ref().is_some_and(|d| d.changed)
    }

    pub fn totals(&self) -> CostTotals {
        calculate_totals(&self.resources)
    }

    pub fn past_totals(&self) -> CostTotals {
        calculate_totals(&self.past_resources)
    }

    pub fn summary(&self) -> ResourceSummary {
        ResourceSummary::from_resources(&self.resources)
    }
}
