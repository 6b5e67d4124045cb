//! # costgraph_plan
//!
//! Turns a Terraform plan into an address-keyed [`ResourceGraph`].
//!
//! - **Loader**: reads plan JSON or generates it with the Terraform CLI
//! - **Parser**: builds resource records, resolves references, infers regions
//! - **Usage**: usage annotations and usage files
//!
//! ```rust
//! use costgraph_plan::{parse_plan, Attributes};
//!
//! let plan = br#"{"planned_values": {"root_module": {"resources": [
//!     {"address": "aws_eip.ip", "type": "aws_eip", "provider_name": "aws", "values": {}}
//! ]}}}"#;
//!
//! let parsed = parse_plan(plan).unwrap();
//! let eip = parsed.current.get("aws_eip.ip").unwrap();
//! assert_eq!(eip.get_str("region"), "us-east-1");
//! ```

pub mod address;
pub mod data;
pub mod error;
pub mod loader;
pub mod parser;
pub mod usage;

pub use data::{Attributes, ResourceData, ResourceGraph, ResourceRef, UsageData};
pub use error::{PlanError, PlanResult};
pub use loader::{PlanLoader, PlanSource, TerraformRunner};
pub use parser::{build_graph, is_usage_annotation, parse_plan, ParsedPlan, DEFAULT_REGION};
pub use usage::UsageFile;
