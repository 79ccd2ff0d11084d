//! Normalize a schema-shaped object, possibly wrapped in generated prose

use std::path::PathBuf;

use clap::Args;
use schemaweave_core::normalize_candidate;

use crate::error::CliError;
use crate::input::load_input;
use crate::output::{OutputFormat, emit};

/// Arguments for the `normalize` command
#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// Schema document or generated text containing one (`-` for stdin)
    pub input: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Output file path (stdout if not provided)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the `normalize` command
pub fn handle_normalize(args: &NormalizeArgs) -> Result<(), CliError> {
    let content = load_input(&args.input)?;
    let schema = normalize_candidate(&content)?;
    emit(&schema, args.format, args.output.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_normalize_fenced_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("reply.txt");
        let output = dir.path().join("schema.json");
        std::fs::write(
            &input,
            r#"Here is the schema:
```json
{"type": "object", "properties": {"data": {"type": "object", "properties": {
  "id": {"type": "integer", "required": true},
}}}}
```
"#,
        )
        .unwrap();

        handle_normalize(&NormalizeArgs {
            input,
            format: OutputFormat::Json,
            output: Some(output.clone()),
        })
        .unwrap();

        let schema: Value = serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(schema["required"], json!(["id"]));
        assert!(schema["properties"]["id"].get("required").is_none());
    }

    #[test]
    fn test_non_object_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("list.json");
        std::fs::write(&input, "[1, 2]").unwrap();
        let result = handle_normalize(&NormalizeArgs {
            input,
            format: OutputFormat::Json,
            output: None,
        });
        assert!(matches!(result, Err(CliError::SchemaError(_))));
    }
}
