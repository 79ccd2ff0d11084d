//! Object schemas: building, normalization and merging
//!
//! Every schema that did not come from [`build_schema`] should pass through
//! [`normalize`] before it is validated against or merged, since generated
//! schemas routinely carry boolean `required` flags, per-property markers and
//! response envelopes.

mod builder;
mod document;
mod error;
mod merge;
mod normalize;
mod required;

pub use builder::build_schema;
pub use document::{Schema, json_type_name};
pub use error::SchemaError;
pub use merge::{merge, merge_all};
pub use normalize::{ENVELOPE_NAMES, normalize, normalize_value};
pub use required::Required;
