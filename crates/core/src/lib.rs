//! SchemaWeave Core - schema inference, normalization, validation and merging
//!
//! Provides:
//! - Field inference from example JSON documents, bounded by a depth limit
//! - Building object schemas from field definitions
//! - Normalization of untrusted, schema-shaped objects
//! - Validation of data against schemas with itemized diagnostics
//! - Merging schemas from several sources with constraint tightening
//! - Aggregation of per-document contributions, concurrently if needed
//!
//! Nothing here performs I/O; callers hand in already extracted JSON values.

pub mod aggregation;
pub mod extract;
pub mod inference;
pub mod schema;
pub mod validation;

pub use aggregation::{
    AggregatedContext, AggregationConfig, ContextAggregator, DocumentCategory, DocumentContext,
    DocumentError, DocumentExtraction, DocumentExtractor, aggregate_concurrently,
};
pub use extract::{normalize_candidate, parse_candidate, parse_field_definitions};
pub use inference::{
    Constraints, FieldDefinition, FieldInferrer, FieldType, InferenceConfig, InferenceError,
    ParsedExample, infer_field_type,
};
pub use schema::{Schema, SchemaError, build_schema, merge, merge_all, normalize, normalize_value};
pub use validation::{
    SchemaValidator, ValidationBackend, ValidationConfig, ValidationDetail, ValidationResult,
};
