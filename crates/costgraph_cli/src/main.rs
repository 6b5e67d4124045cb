//! costgraph CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 3: Plan or input error
//! - 4: Pricing error

use std::process::ExitCode;

use clap::Parser;
use costgraph_plan::PlanError;
use costgraph_prices::PricingError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod pipeline;
mod render;

use commands::{Cli, Commands};
use config::ConfigError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const INPUT_ERROR: u8 = 3;
    pub const PRICING_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Breakdown(args) => commands::breakdown::execute(args).await,
        Commands::Diff(args) => commands::diff::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if cause.is::<ConfigError>() {
            return ExitCodes::INVALID_ARGS;
        }
        if cause.is::<PlanError>() {
            return ExitCodes::INPUT_ERROR;
        }
        if cause.is::<PricingError>() {
            return ExitCodes::PRICING_ERROR;
        }
    }
    ExitCodes::GENERAL_ERROR
}
