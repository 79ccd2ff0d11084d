//! Engine configuration loaded from TOML

use std::path::Path;

use schemaweave_core::aggregation::AggregationConfig;
use schemaweave_core::inference::InferenceConfig;
use schemaweave_core::validation::ValidationConfig;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Settings for every engine component, each section optional
///
/// ```toml
/// [inference]
/// maxDepth = 6
///
/// [validation]
/// backend = "fallback"
///
/// [aggregation]
/// maxExamples = 3
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub inference: InferenceConfig,
    pub validation: ValidationConfig,
    pub aggregation: AggregationConfig,
}

impl EngineConfig {
    /// Load from a TOML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        toml::from_str(content).map_err(|e| CliError::ConfigError(e.to_string()))
    }
}
