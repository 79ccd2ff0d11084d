//! Configuration for schema validation

use serde::{Deserialize, Serialize};

/// Which engine checks data against a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationBackend {
    /// Library engine when compiled in, hand-rolled engine otherwise
    #[default]
    Auto,
    /// The `jsonschema` crate (requires the `schema-validation` feature)
    Library,
    /// The hand-rolled engine
    Fallback,
}

/// Configuration for [`SchemaValidator`](super::SchemaValidator)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationConfig {
    pub backend: ValidationBackend,
    /// Report data keys with no declared property as warnings
    pub warn_undeclared: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            backend: ValidationBackend::Auto,
            warn_undeclared: true,
        }
    }
}

impl ValidationConfig {
    pub fn builder() -> ValidationConfigBuilder {
        ValidationConfigBuilder::default()
    }
}

/// Builder for [`ValidationConfig`]
#[derive(Debug, Default)]
pub struct ValidationConfigBuilder {
    config: ValidationConfig,
}

impl ValidationConfigBuilder {
    pub fn backend(mut self, backend: ValidationBackend) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn warn_undeclared(mut self, warn: bool) -> Self {
        self.config.warn_undeclared = warn;
        self
    }

    pub fn build(self) -> ValidationConfig {
        self.config
    }
}
