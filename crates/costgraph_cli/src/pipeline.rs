//! The per-project pipeline: load, build, price, aggregate.

use std::sync::Arc;

use anyhow::{Context, Result};
use costgraph_plan::{parse_plan, PlanLoader, PlanSource, ResourceGraph, TerraformRunner, UsageData, UsageFile};
use costgraph_prices::{GraphQLPricingSource, PriceResolver, PricingReport};
use costgraph_providers::{default_registry, ResourceRegistry};
use costgraph_schema::{Project, Resource};
use tracing::info;

use crate::config::{ProjectConfig, RunConfig};

/// A priced project and the warnings raised while pricing it.
#[derive(Debug)]
pub struct ProjectRun {
    pub project: Project,
    pub report: PricingReport,
}

pub struct Pipeline {
    terraform_binary: String,
    registry: ResourceRegistry,
    resolver: PriceResolver,
}

impl Pipeline {
    pub fn new(config: &RunConfig) -> Self {
        let source = GraphQLPricingSource::new(&config.pricing_api_endpoint, config.api_key.clone());
        let resolver = PriceResolver::new(Arc::new(source)).with_options(config.resolver.clone());
        Self::from_parts(&config.terraform_binary, default_registry(), resolver)
    }

    pub fn from_parts(terraform_binary: &str, registry: ResourceRegistry, resolver: PriceResolver) -> Self {
        Self {
            terraform_binary: terraform_binary.to_string(),
            registry,
            resolver,
        }
    }

    pub async fn run(&self, config: &ProjectConfig) -> Result<ProjectRun> {
        let name = config.path.display().to_string();
        info!("Evaluating project {}", name);

        let mut runner = TerraformRunner::new(&self.terraform_binary);
        if let Some(flags) = &config.terraform_plan_flags {
            runner = runner.with_plan_flags(flags);
        }
        let source = PlanSource::detect(&config.path).with_context(|| format!("Failed to open {}", name))?;
        let json = PlanLoader::new(runner)
            .load_json(&source)
            .await
            .with_context(|| format!("Failed to load plan for {}", name))?;
        let mut plan = parse_plan(&json).with_context(|| format!("Failed to parse plan for {}", name))?;

        if let Some(usage_file) = &config.usage_file {
            let usage = UsageFile::load(usage_file)
                .and_then(UsageFile::into_usage)
                .with_context(|| format!("Failed to load usage file {}", usage_file.display()))?;
            apply_usage(&mut plan.current, &usage);
            if let Some(past) = plan.past.as_mut() {
                apply_usage(past, &usage);
            }
        }

        let mut resources = self.registry.build_resources(&plan.current);
        let mut past_resources = plan
            .past
            .as_ref()
            .map(|past| self.registry.build_resources(past))
            .unwrap_or_default();

        let mut report = self
            .resolver
            .resolve(&mut resources)
            .await
            .context("Failed to retrieve prices")?;
        let past_report = self
            .resolver
            .resolve(&mut past_resources)
            .await
            .context("Failed to retrieve prices for prior state")?;
        report.components += past_report.components;
        report.queries += past_report.queries;
        report.warnings.extend(past_report.warnings);

        let mut project = Project::new(name).with_metadata("type", source.kind());
        project.resources = resources;
        project.past_resources = past_resources;
        project.calculate_diff();

        Ok(ProjectRun { project, report })
    }
}

fn apply_usage(graph: &mut ResourceGraph, usage: &[UsageData]) {
    graph.merge_usage(usage.iter().cloned());
}

/// Every node that ended up skipped because its type has no cost model.
pub fn unsupported(resources: &[Resource]) -> impl Iterator<Item = &Resource> {
    resources.iter().filter(|r| r.is_skipped && !r.no_price)
}
