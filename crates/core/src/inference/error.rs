//! Error types for field inference

use thiserror::Error;

/// Errors that can occur while turning example JSON into field definitions
///
/// Depth truncation is deliberately absent: exceeding the configured depth is
/// a reported truncation, not a failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// JSON parsing error
    #[error("Invalid JSON format: {0}")]
    JsonParse(String),

    /// Serialized source text exceeds the configured ceiling
    #[error("JSON input too large: {size} bytes exceeds maximum of {max} bytes")]
    InputTooLarge { size: usize, max: usize },
}

impl From<serde_json::Error> for InferenceError {
    fn from(e: serde_json::Error) -> Self {
        InferenceError::JsonParse(e.to_string())
    }
}
