//! Usage file loading.
//!
//! ```yaml
//! version: 0.1
//! resource_usage:
//!   aws_sqs_queue.orders:
//!     monthly_requests: 1000000
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::data::UsageData;
use crate::error::PlanResult;

const SUPPORTED_VERSION: &str = "0.1";

/// A parsed usage file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageFile {
    #[serde(default)]
    pub version: serde_yaml::Value,
    #[serde(default)]
    pub resource_usage: BTreeMap<String, serde_yaml::Value>,
}

impl UsageFile {
    pub fn load(path: &Path) -> PlanResult<Self> {
        debug!("Loading usage file {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> PlanResult<Self> {
        let file: UsageFile = serde_yaml::from_str(content)?;

        let version = match &file.version {
            serde_yaml::Value::String(s) => s.clone(),
            serde_yaml::Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        if version != SUPPORTED_VERSION {
            warn!(
                "Usage file version {:?} is not {}, reading it anyway",
                version, SUPPORTED_VERSION
            );
        }

        Ok(file)
    }

    /// Convert the file into per-address usage entries.
    pub fn into_usage(self) -> PlanResult<Vec<UsageData>> {
        self.resource_usage
            .into_iter()
            .map(|(address, values)| -> PlanResult<UsageData> {
                Ok(UsageData::new(address, serde_json::to_value(values)?))
            })
            .collect()
    }
}
