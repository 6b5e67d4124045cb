//! Serializable breakdown handed to renderers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::costs::CostTotals;
use crate::diff::Diff;
use crate::error::SchemaResult;
use crate::project::{Project, ResourceSummary};
use crate::resource::{CostComponent, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOutput {
    pub name: String,
    pub unit: String,
    pub hourly_quantity: Option<Decimal>,
    pub monthly_quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_hash: Option<String>,
    pub hourly_cost: Option<Decimal>,
    pub monthly_cost: Option<Decimal>,
}

impl From<&CostComponent> for ComponentOutput {
    fn from(c: &CostComponent) -> Self {
        Self {
            name: c.name.clone(),
            unit: c.unit.clone(),
            hourly_quantity: c.hourly_quantity(),
            monthly_quantity: c.monthly_quantity(),
            price: c.price(),
            price_hash: c.price_hash().map(str::to_string),
            hourly_cost: c.hourly_cost(),
            monthly_cost: c.monthly_cost(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOutput {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub resource_type: String,
    pub no_price: bool,
    pub is_skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_message: Option<String>,
    pub hourly_cost: Decimal,
    pub monthly_cost: Decimal,
    pub cost_components: Vec<ComponentOutput>,
    pub sub_resources: Vec<ResourceOutput>,
}

impl From<&Resource> for ResourceOutput {
    fn from(r: &Resource) -> Self {
        Self {
            name: r.name.clone(),
            resource_type: r.resource_type.clone(),
            no_price: r.no_price,
            is_skipped: r.is_skipped,
            skip_message: r.skip_message.clone(),
            hourly_cost: r.hourly_cost(),
            monthly_cost: r.monthly_cost(),
            cost_components: r.cost_components.iter().map(ComponentOutput::from).collect(),
            sub_resources: r.sub_resources.iter().map(ResourceOutput::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOutput {
    pub name: String,
    pub past_resources: Vec<ResourceOutput>,
    pub resources: Vec<ResourceOutput>,
    pub totals: CostTotals,
    pub past_totals: CostTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Diff>,
    pub summary: ResourceSummary,
}

impl From<&Project> for ProjectOutput {
    fn from(p: &Project) -> Self {
        Self {
            name: p.name.clone(),
            past_resources: p.past_resources.iter().map(ResourceOutput::from).collect(),
            resources: p.resources.iter().map(ResourceOutput::from).collect(),
            totals: p.totals(),
            past_totals: p.past_totals(),
            diff: p.diff.clone(),
            summary: p.summary(),
        }
    }
}

/// The complete output of a run across all projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    pub projects: Vec<ProjectOutput>,
    pub totals: CostTotals,
    pub summary: ResourceSummary,
    pub time_generated: DateTime<Utc>,
}

impl Root {
    pub fn from_projects(projects: &[Project]) -> Self {
        let outputs: Vec<ProjectOutput> = projects.iter().map(ProjectOutput::from).collect();

        let mut totals = CostTotals::default();
        let mut summary = ResourceSummary::default();
        for p in &outputs {
            totals.add(&p.totals);
            summary.add(&p.summary);
        }

        Self {
            projects: outputs,
            totals,
            summary,
            time_generated: Utc::now(),
        }
    }

    pub fn to_json(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ProductFilter;

    fn sample_project() -> Project {
        let mut c = CostComponent::hourly("Instance usage", "hours", Some(Decimal::ONE), ProductFilter::new("aws"));
        c.set_price(Decimal::new(5, 2));
        c.set_price_hash("hash-1");
        let nil = CostComponent::monthly("Requests", "1M requests", None, ProductFilter::new("aws"));

        let mut project = Project::new("plan.json");
        project.resources = vec![
            Resource::new("aws_instance.web", "aws_instance").with_component(c).with_component(nil),
            Resource::free("aws_vpc.main", "aws_vpc"),
        ];
        project
    }

    #[test]
    fn test_resource_output_keeps_order_and_nil_quantities() {
        let project = sample_project();
        let out = ResourceOutput::from(&project.resources[0]);

        assert_eq!(out.cost_components[0].name, "Instance usage");
        assert_eq!(out.cost_components[0].price_hash.as_deref(), Some("hash-1"));
        assert_eq!(out.cost_components[0].monthly_cost, Some(Decimal::new(365, 1)));
        assert_eq!(out.cost_components[1].name, "Requests");
        assert!(out.cost_components[1].monthly_quantity.is_none());
        assert_eq!(out.monthly_cost, Decimal::new(365, 1));
    }

    #[test]
    fn test_root_aggregates_projects() {
        let root = Root::from_projects(&[sample_project(), sample_project()]);
        assert_eq!(root.projects.len(), 2);
        assert_eq!(root.totals.monthly_cost, Decimal::from(73));
        assert_eq!(root.summary.total, 4);
        assert_eq!(root.summary.total_no_price, 2);
    }

    #[test]
    fn test_json_output_contract() {
        let root = Root::from_projects(&[sample_project()]);
        let json: serde_json::Value = serde_json::from_str(&root.to_json().unwrap()).unwrap();

        let resource = &json["projects"][0]["resources"][0];
        assert_eq!(resource["name"], "aws_instance.web");
        assert_eq!(resource["noPrice"], false);
        assert!(resource["costComponents"][1]["monthlyQuantity"].is_null());
        assert_eq!(json["projects"][0]["resources"][1]["isSkipped"], true);
    }
}
