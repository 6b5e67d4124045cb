//! Breakdown command - Full cost breakdown of the planned resources.

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::RunArgs;
use crate::config::{OutputFormat, RunConfig};
use crate::pipeline::{Pipeline, ProjectRun};
use crate::render;

#[derive(Args)]
pub struct BreakdownArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// List unsupported resources
    #[arg(long)]
    pub show_skipped: bool,
}

pub async fn execute(args: BreakdownArgs) -> Result<()> {
    let config = RunConfig::from_args(&args.run)?;
    let runs = evaluate(&config).await?;
    let projects: Vec<_> = runs.into_iter().map(|run| run.project).collect();

    match config.format {
        OutputFormat::Json => println!("{}", render::render_json(&projects)?),
        OutputFormat::Table => print!("{}", render::render_table(&projects, args.show_skipped)),
    }
    Ok(())
}

/// Evaluate every configured project in order.
pub(crate) async fn evaluate(config: &RunConfig) -> Result<Vec<ProjectRun>> {
    let pipeline = Pipeline::new(config);
    let mut runs = Vec::with_capacity(config.projects.len());

    for project in &config.projects {
        let run = pipeline.run(project).await?;
        if run.report.has_warnings() {
            eprintln!(
                "Warning: {} cost components of {} could not be priced exactly",
                run.report.warnings.len(),
                run.project.name
            );
        }
        info!(
            "Priced {} components of {} with {} queries",
            run.report.components, run.project.name, run.report.queries
        );
        runs.push(run);
    }
    Ok(runs)
}
