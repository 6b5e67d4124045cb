//! Differences between two cost model forests.
//!
//! Resources are matched by name, sub-resources by name within their
//! matched parent, and cost components by name within their resource.
//! Every numeric field of the result is `current - past`, with a missing
//! side counted as zero. Entries keep the order of the current forest,
//! followed by entries that only exist in the past forest.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::resource::{CostComponent, Resource};

/// Delta of a single cost component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDiff {
    pub name: String,
    pub unit: String,
    pub hourly_quantity: Decimal,
    pub monthly_quantity: Decimal,
    pub price: Decimal,
    pub hourly_cost: Decimal,
    pub monthly_cost: Decimal,
    pub monthly_discount_perc: f64,
}

impl ComponentDiff {
    fn is_changed(&self) -> bool {
        !self.hourly_quantity.is_zero()
            || !self.monthly_quantity.is_zero()
            || !self.hourly_cost.is_zero()
            || !self.monthly_cost.is_zero()
    }
}

/// Delta of a resource and, recursively, its sub-resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDiff {
    pub name: String,
    pub hourly_cost: Decimal,
    pub monthly_cost: Decimal,
    pub cost_components: Vec<ComponentDiff>,
    pub sub_resources: Vec<ResourceDiff>,
}

/// The diff forest of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diff {
    pub resources: Vec<ResourceDiff>,
    pub changed: bool,
}

impl Diff {
    pub fn total_hourly_cost(&self) -> Decimal {
        self.resources.iter().map(|r| r.hourly_cost).sum()
    }

    pub fn total_monthly_cost(&self) -> Decimal {
        self.resources.iter().map(|r| r.monthly_cost).sum()
    }
}

/// Compute the delta forest from `past` to `current`.
pub fn calculate_diff(past: &[Resource], current: &[Resource]) -> Diff {
    let (changed, resources) = diff_resources(past, current);
    Diff { resources, changed }
}

fn diff_resources(past: &[Resource], current: &[Resource]) -> (bool, Vec<ResourceDiff>) {
    let past_by_name: HashMap<&str, &Resource> = past.iter().map(|r| (r.name.as_str(), r)).collect();
    let current_names: HashSet<&str> = current.iter().map(|r| r.name.as_str()).collect();

    let mut changed = false;
    let mut diffs = Vec::with_capacity(current.len());

    for resource in current {
        let (c, d) = diff_resource(past_by_name.get(resource.name.as_str()).copied(), Some(resource));
        changed |= c;
        diffs.push(d);
    }

    for resource in past.iter().filter(|r| !current_names.contains(r.name.as_str())) {
        let (c, d) = diff_resource(Some(resource), None);
        changed |= c;
        diffs.push(d);
    }

    (changed, diffs)
}

fn diff_resource(past: Option<&Resource>, current: Option<&Resource>) -> (bool, ResourceDiff) {
    let name = current.or(past).map(|r| r.name.clone()).unwrap_or_default();

    let (components_changed, cost_components) = diff_components(
        past.map(|r| r.cost_components.as_slice()).unwrap_or_default(),
        current.map(|r| r.cost_components.as_slice()).unwrap_or_default(),
    );
    let (subs_changed, sub_resources) = diff_resources(
        past.map(|r| r.sub_resources.as_slice()).unwrap_or_default(),
        current.map(|r| r.sub_resources.as_slice()).unwrap_or_default(),
    );

    let hourly_cost = diff_decimals(current.map(|r| r.hourly_cost()), past.map(|r| r.hourly_cost()));
    let monthly_cost = diff_decimals(current.map(|r| r.monthly_cost()), past.map(|r| r.monthly_cost()));

    let changed =
        components_changed || subs_changed || !hourly_cost.is_zero() || !monthly_cost.is_zero();

    (
        changed,
        ResourceDiff {
            name,
            hourly_cost,
            monthly_cost,
            cost_components,
            sub_resources,
        },
    )
}

fn diff_components(past: &[CostComponent], current: &[CostComponent]) -> (bool, Vec<ComponentDiff>) {
    let past_by_name: HashMap<&str, &CostComponent> = past.iter().map(|c| (c.name.as_str(), c)).collect();
    let current_names: HashSet<&str> = current.iter().map(|c| c.name.as_str()).collect();

    let mut changed = false;
    let mut diffs = Vec::with_capacity(current.len());

    for component in current {
        let d = diff_component(past_by_name.get(component.name.as_str()).copied(), Some(component));
        changed |= d.is_changed();
        diffs.push(d);
    }

    for component in past.iter().filter(|c| !current_names.contains(c.name.as_str())) {
        let d = diff_component(Some(component), None);
        changed |= d.is_changed();
        diffs.push(d);
    }

    (changed, diffs)
}

fn diff_component(past: Option<&CostComponent>, current: Option<&CostComponent>) -> ComponentDiff {
    let base = current.or(past);

    ComponentDiff {
        name: base.map(|c| c.name.clone()).unwrap_or_default(),
        unit: base.map(|c| c.unit.clone()).unwrap_or_default(),
        hourly_quantity: diff_decimals(
            current.and_then(|c| c.hourly_quantity()),
            past.and_then(|c| c.hourly_quantity()),
        ),
        monthly_quantity: diff_decimals(
            current.and_then(|c| c.monthly_quantity()),
            past.and_then(|c| c.monthly_quantity()),
        ),
        price: diff_decimals(current.and_then(|c| c.price()), past.and_then(|c| c.price())),
        hourly_cost: diff_decimals(
            current.and_then(|c| c.hourly_cost()),
            past.and_then(|c| c.hourly_cost()),
        ),
        monthly_cost: diff_decimals(
            current.and_then(|c| c.monthly_cost()),
            past.and_then(|c| c.monthly_cost()),
        ),
        monthly_discount_perc: current.map(|c| c.monthly_discount_perc).unwrap_or_default()
            - past.map(|c| c.monthly_discount_perc).unwrap_or_default(),
    }
}

fn diff_decimals(current: Option<Decimal>, past: Option<Decimal>) -> Decimal {
    current.unwrap_or_default() - past.unwrap_or_default()
}
