//! CLI error types

use std::path::PathBuf;

use schemaweave_core::{InferenceError, SchemaError};
use thiserror::Error;

/// Errors surfaced by `swv` commands
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Inference failed: {0}")]
    InferenceError(#[from] InferenceError),

    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaError),

    #[error("Serialization failed: {0}")]
    SerializationError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}
