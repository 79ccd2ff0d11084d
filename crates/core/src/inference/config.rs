//! Configuration for field inference

use serde::{Deserialize, Serialize};

/// Default ceiling on the serialized example text (1 MiB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

/// Configuration for field inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Maximum nesting depth for objects and array items
    pub max_depth: usize,

    /// Maximum size of the serialized source text accepted by `parse_json`
    pub max_input_bytes: usize,

    /// Classify `YYYY-MM-DD` strings as `date` and timestamps as `datetime`
    pub detect_temporal: bool,

    /// Attach heuristic constraints (lengths, ranges, item counts, email pattern)
    pub infer_constraints: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            detect_temporal: true,
            infer_constraints: true,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Set the maximum accepted input size in bytes (at least 1)
    pub fn max_input_bytes(mut self, bytes: usize) -> Self {
        self.config.max_input_bytes = bytes.max(1);
        self
    }

    /// Enable or disable date/datetime detection
    pub fn detect_temporal(mut self, detect: bool) -> Self {
        self.config.detect_temporal = detect;
        self
    }

    /// Enable or disable constraint inference
    pub fn infer_constraints(mut self, infer: bool) -> Self {
        self.config.infer_constraints = infer;
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}
