//! Error types for per-document extraction

use thiserror::Error;

use crate::inference::InferenceError;
use crate::schema::SchemaError;

/// Why a single document produced no extraction result
///
/// These never abort an aggregation; the aggregator records them against the
/// document's index and carries on with the rest.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// The extraction collaborator failed (timeout, upstream error, ...)
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The document's example payload could not be inferred
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// The document's schema or generated text was unusable
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Result type for per-document extraction
pub type DocumentResult<T> = Result<T, DocumentError>;
