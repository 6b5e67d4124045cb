//! Run configuration assembled from flags, environment and config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use costgraph_prices::ResolverOptions;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::commands::RunArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Either --path or --config-file is required")]
    MissingPath,

    #[error("--path and --config-file cannot be used together")]
    ConflictingPath,

    #[error("No pricing API key configured, set COSTGRAPH_API_KEY or pass --api-key")]
    MissingApiKey,

    #[error("Config file {0} does not list any projects")]
    NoProjects(String),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// One project to evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub usage_file: Option<PathBuf>,
    #[serde(default)]
    pub terraform_plan_flags: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// The `--config-file` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub projects: Vec<ProjectConfig>,
    pub pricing: PricingConfig,
}

impl ConfigFile {
    /// Load a config file. Relative project paths are resolved against the
    /// directory holding the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: ConfigFile = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        if config.projects.is_empty() {
            return Err(ConfigError::NoProjects(path.display().to_string()));
        }

        let base = path.parent().unwrap_or(Path::new(""));
        for project in &mut config.projects {
            project.path = base.join(&project.path);
            if let Some(usage) = project.usage_file.take() {
                project.usage_file = Some(base.join(usage));
            }
        }
        Ok(config)
    }
}

/// Everything a run needs, threaded explicitly through the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub projects: Vec<ProjectConfig>,
    pub terraform_binary: String,
    pub pricing_api_endpoint: String,
    pub api_key: String,
    pub resolver: ResolverOptions,
    pub format: OutputFormat,
}

impl RunConfig {
    /// Flags take precedence over config file settings.
    pub fn from_args(args: &RunArgs) -> Result<Self, ConfigError> {
        let (projects, pricing) = match (&args.path, &args.config_file) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingPath),
            (None, None) => return Err(ConfigError::MissingPath),
            (Some(path), None) => (
                vec![ProjectConfig {
                    path: path.clone(),
                    usage_file: args.usage_file.clone(),
                    terraform_plan_flags: args.terraform_plan_flags.clone(),
                }],
                PricingConfig::default(),
            ),
            (None, Some(file)) => {
                debug!("Loading config file {:?}", file);
                let config = ConfigFile::load(file)?;
                (config.projects, config.pricing)
            }
        };

        let api_key = args
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut resolver = ResolverOptions::default();
        if let Some(concurrency) = args.concurrency.or(pricing.concurrency) {
            resolver = resolver.with_concurrency(concurrency);
        }
        if let Some(secs) = args.timeout_secs.or(pricing.timeout_secs) {
            resolver = resolver.with_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            projects,
            terraform_binary: args.terraform_binary.clone(),
            pricing_api_endpoint: args.pricing_api_endpoint.clone(),
            api_key,
            resolver,
            format: args.format,
        })
    }
}
