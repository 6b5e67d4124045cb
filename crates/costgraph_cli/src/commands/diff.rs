//! Diff command - Cost change between the prior state and the plan.

use anyhow::Result;
use clap::Args;

use super::breakdown::evaluate;
use super::RunArgs;
use crate::config::{OutputFormat, RunConfig};
use crate::render;

#[derive(Args)]
pub struct DiffArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

pub async fn execute(args: DiffArgs) -> Result<()> {
    let config = RunConfig::from_args(&args.run)?;
    let projects: Vec<_> = evaluate(&config).await?.into_iter().map(|run| run.project).collect();

    match config.format {
        OutputFormat::Json => println!("{}", render::render_json(&projects)?),
        OutputFormat::Table => print!("{}", render::render_diff(&projects)),
    }
    Ok(())
}
