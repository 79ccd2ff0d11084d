//! Schema shape errors

use thiserror::Error;

/// Errors raised when a value cannot be used as an object schema
///
/// These are structural problems with the schema itself and are kept apart
/// from data validation failures, which are always reported as data.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    /// The schema is not a JSON object
    #[error("Schema must be a JSON object, found {found}")]
    NotAnObject { found: String },

    /// The schema declares a root type other than `object`
    #[error("Unsupported root schema type '{0}', expected 'object'")]
    UnsupportedRootType(String),

    /// A validation engine could not compile the normalized schema
    #[error("Schema could not be compiled: {0}")]
    Compile(String),

    /// Untrusted candidate text could not be recovered into JSON
    #[error("Could not recover JSON from candidate text: {0}")]
    Candidate(String),
}
