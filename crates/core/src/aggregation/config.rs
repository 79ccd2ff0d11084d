//! Configuration for multi-document aggregation

use serde::{Deserialize, Serialize};

/// Caps and concurrency for [`ContextAggregator`](super::ContextAggregator)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregationConfig {
    /// Examples kept after concatenation in input order
    pub max_examples: usize,
    /// Test points kept after concatenation in input order
    pub max_test_points: usize,
    /// Business rules kept after concatenation in input order
    pub max_business_rules: usize,
    /// Characters of raw content kept per document
    pub max_raw_content_chars: usize,
    /// Extractions run at once by the concurrent driver
    pub concurrency: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_examples: 5,
            max_test_points: 10,
            max_business_rules: 20,
            max_raw_content_chars: 2000,
            concurrency: 4,
        }
    }
}

impl AggregationConfig {
    pub fn builder() -> AggregationConfigBuilder {
        AggregationConfigBuilder::default()
    }
}

/// Builder for [`AggregationConfig`]
#[derive(Debug, Default)]
pub struct AggregationConfigBuilder {
    config: AggregationConfig,
}

impl AggregationConfigBuilder {
    pub fn max_examples(mut self, max: usize) -> Self {
        self.config.max_examples = max;
        self
    }

    pub fn max_test_points(mut self, max: usize) -> Self {
        self.config.max_test_points = max;
        self
    }

    pub fn max_business_rules(mut self, max: usize) -> Self {
        self.config.max_business_rules = max;
        self
    }

    pub fn max_raw_content_chars(mut self, max: usize) -> Self {
        self.config.max_raw_content_chars = max;
        self
    }

    /// Set the concurrency limit (at least 1)
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency.max(1);
        self
    }

    pub fn build(self) -> AggregationConfig {
        self.config
    }
}
