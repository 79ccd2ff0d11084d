//! Aggregation of contributions from several independently processed documents
//!
//! Schema-bearing documents contribute field definitions (deduplicated by
//! name), schemas and examples; test-point-bearing documents contribute test
//! points, entities and business rules; unclassified documents contribute raw
//! text. Collections are capped, and every cap that dropped data is recorded
//! in the [`TruncationReport`].

mod aggregator;
mod concurrent;
mod config;
mod error;
mod types;

pub use aggregator::ContextAggregator;
pub use concurrent::{DocumentExtractor, aggregate_concurrently};
pub use config::{AggregationConfig, AggregationConfigBuilder};
pub use error::{DocumentError, DocumentResult};
pub use types::{
    AggregatedContext, AggregationCounts, CategoryCount, DocumentCategory, DocumentContext,
    DocumentExtraction, Entity, FailedDocument, SchemaContext, TestPointContext, TruncationReport,
};
