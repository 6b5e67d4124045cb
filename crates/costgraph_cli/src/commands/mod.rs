//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use costgraph_prices::DEFAULT_PRICING_API_ENDPOINT;

use crate::config::OutputFormat;

pub mod breakdown;
pub mod diff;

/// costgraph - cloud cost estimates for Terraform plans
#[derive(Parser)]
#[command(name = "costgraph")]
#[command(version, about = "costgraph - cloud cost estimates for Terraform plans")]
#[command(long_about = r#"
costgraph reads a Terraform plan, maps each resource to a cost model,
prices it against the pricing API and reports hourly and monthly costs.

COMMANDS:
  breakdown  → Full cost breakdown of the planned resources
  diff       → Cost change between the prior state and the plan

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or configuration
  3 - Plan or input error
  4 - Pricing error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log level filter, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a full cost breakdown
    Breakdown(breakdown::BreakdownArgs),

    /// Show the cost change between prior state and plan
    Diff(diff::DiffArgs),
}

/// Options shared by every command that evaluates projects.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to a plan JSON file, a saved plan or a Terraform directory
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// YAML config file listing projects
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Usage file with estimates for usage-based resources
    #[arg(long)]
    pub usage_file: Option<PathBuf>,

    /// Extra flags passed to `terraform plan`
    #[arg(long)]
    pub terraform_plan_flags: Option<String>,

    /// Terraform binary
    #[arg(long, env = "TERRAFORM_BINARY", default_value = "terraform")]
    pub terraform_binary: String,

    /// Pricing API endpoint
    #[arg(long, env = "COSTGRAPH_PRICING_API_ENDPOINT", default_value = DEFAULT_PRICING_API_ENDPOINT)]
    pub pricing_api_endpoint: String,

    /// Pricing API key
    #[arg(long, env = "COSTGRAPH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum number of concurrent price queries
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Deadline for price resolution, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}
