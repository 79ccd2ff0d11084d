//! Validation of data against object schemas
//!
//! Two engines sit behind [`ValidationEngine`]: the `jsonschema` crate
//! (feature `schema-validation`, on by default) and a hand-rolled
//! [`FallbackEngine`]. Both report missing required fields, type mismatches
//! and constraint violations; paths and report shape are identical.

mod config;
mod engine;
mod fallback;
#[cfg(feature = "schema-validation")]
mod library;
mod report;
mod validator;

pub use config::{ValidationBackend, ValidationConfig, ValidationConfigBuilder};
pub use engine::{Target, ValidationEngine};
pub use fallback::FallbackEngine;
#[cfg(feature = "schema-validation")]
pub use library::JsonSchemaEngine;
pub use report::{ValidationDetail, ValidationResult};
pub use validator::{SchemaValidator, validate};
