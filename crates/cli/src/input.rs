//! Reading command inputs from files or stdin

use std::io::Read;
use std::path::Path;

use schemaweave_core::Schema;
use schemaweave_core::extract::parse_candidate;
use serde_json::Value;

use crate::error::CliError;

/// Load input content from a file, or stdin when the path is `-`
pub fn load_input(input: &Path) -> Result<String, CliError> {
    if input == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        std::fs::read_to_string(input).map_err(|e| CliError::FileReadError(input.to_path_buf(), e.to_string()))
    }
}

/// Load input and recover the JSON it carries
///
/// Accepts plain JSON as well as generated text with fences or prose.
pub fn load_json(input: &Path) -> Result<Value, CliError> {
    let content = load_input(input)?;
    Ok(parse_candidate(&content)?)
}

/// Load a schema-shaped object
pub fn load_schema(input: &Path) -> Result<Schema, CliError> {
    Ok(Schema::from_value(load_json(input)?)?)
}

/// Display name for an input path
pub fn display_name(input: &Path) -> String {
    if input == Path::new("-") {
        "<stdin>".to_string()
    } else {
        input.display().to_string()
    }
}
