//! Error types for plan loading and parsing.

use thiserror::Error;

/// Result type alias for plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that can occur while loading or parsing a plan.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid plan JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid usage file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terraform binary \"{0}\" not found in PATH; set TERRAFORM_BINARY to use a custom binary")]
    TerraformNotFound(String),

    #[error("terraform {command} failed: {stderr}")]
    Terraform { command: String, stderr: String },

    #[error("Unsupported path {0}: expected a plan JSON file, a plan file or a directory of .tf files")]
    UnsupportedPath(String),
}
