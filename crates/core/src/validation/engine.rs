//! Validation engine strategy

use serde_json::Value;

use super::report::ValidationDetail;
use crate::schema::{Schema, SchemaError};

/// A value to validate together with its location in the input
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    /// Path prefix; empty for a single top-level object, `item[i]` for list entries
    pub prefix: &'a str,
    pub value: &'a Value,
}

impl<'a> Target<'a> {
    pub fn new(prefix: &'a str, value: &'a Value) -> Self {
        Self { prefix, value }
    }

    /// Path used for failures about the value itself
    pub fn self_path(&self) -> &str {
        if self.prefix.is_empty() { "root" } else { self.prefix }
    }
}

/// Checks data against an already normalized object schema
///
/// Implementations must report every missing required field, every type
/// mismatch and every constraint violation; none may be dropped.
pub trait ValidationEngine: Send + Sync {
    /// Short engine name for logs and reports
    fn name(&self) -> &'static str;

    /// Validate each target, returning failures in target order
    fn validate(&self, schema: &Schema, targets: &[Target<'_>]) -> Result<Vec<ValidationDetail>, SchemaError>;
}

/// Append a property name to a path
pub(crate) fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

/// Append an array index to a path
pub(crate) fn index_path(prefix: &str, index: usize) -> String {
    if prefix.is_empty() {
        format!("root[{}]", index)
    } else {
        format!("{}[{}]", prefix, index)
    }
}
