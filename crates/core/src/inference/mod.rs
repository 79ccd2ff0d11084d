//! Field inference from example JSON documents
//!
//! Turns an example value into a tree of field descriptors (type, heuristic
//! constraints, description) bounded by a recursion-depth limit, and builds
//! the matching object schema.
//!
//! ## Example
//!
//! ```rust,ignore
//! use schemaweave_core::inference::{FieldInferrer, InferenceConfig};
//!
//! let inferrer = FieldInferrer::with_config(InferenceConfig::builder().max_depth(4).build());
//! let parsed = inferrer.parse_json(r#"{"name": "Alice", "age": 30}"#)?;
//!
//! println!("{}", serde_json::to_string_pretty(&parsed.schema)?);
//! for field in &parsed.field_definitions {
//!     println!("{} -> {}", field.path, field.field_type);
//! }
//! ```

mod config;
mod describe;
mod error;
mod formats;
mod inferrer;
mod types;

pub use config::{DEFAULT_MAX_INPUT_BYTES, InferenceConfig, InferenceConfigBuilder};
pub use describe::{describe_field, split_words};
pub use error::InferenceError;
pub use formats::{EMAIL_PATTERN, Format, detect_format, looks_like_email};
pub use inferrer::{FieldInference, FieldInferrer, ParsedExample, infer_field_type};
pub(crate) use types::compare_numbers;
pub use types::{ArrayItems, Constraints, FieldDefinition, FieldType};
