//! Infer a schema from an example document

use std::path::PathBuf;

use clap::Args;
use schemaweave_core::{FieldInferrer, InferenceConfig};

use crate::error::CliError;
use crate::input::{display_name, load_input};
use crate::output::{OutputFormat, emit};

/// Arguments for the `infer` command
#[derive(Args, Debug, Clone)]
pub struct InferArgs {
    /// Example JSON document (`-` for stdin)
    pub input: PathBuf,
    /// Override the maximum nesting depth
    #[arg(long)]
    pub max_depth: Option<usize>,
    /// Print the field catalogue instead of the schema
    #[arg(long, conflicts_with = "full")]
    pub fields: bool,
    /// Print schema, field catalogue and truncation together
    #[arg(long)]
    pub full: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Output file path (stdout if not provided)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the `infer` command
pub fn handle_infer(args: &InferArgs, config: &InferenceConfig) -> Result<(), CliError> {
    let mut config = config.clone();
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }

    let content = load_input(&args.input)?;
    let parsed = FieldInferrer::with_config(config).parse_json(&content)?;

    eprintln!("Inferred {} field(s) from {}", parsed.field_definitions.len(), display_name(&args.input));
    if parsed.truncated {
        eprintln!("  Depth limit reached at: {}", parsed.truncated_paths.join(", "));
    }

    if args.full {
        emit(&parsed, args.format, args.output.as_ref())
    } else if args.fields {
        emit(&parsed.field_definitions, args.format, args.output.as_ref())
    } else {
        emit(&parsed.schema, args.format, args.output.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn run(example: &str, max_depth: Option<usize>, fields: bool) -> Value {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("example.json");
        let output = dir.path().join("schema.json");
        std::fs::write(&input, example).unwrap();

        let args = InferArgs {
            input,
            max_depth,
            fields,
            full: false,
            format: OutputFormat::Json,
            output: Some(output.clone()),
        };
        handle_infer(&args, &InferenceConfig::default()).unwrap();
        serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap()
    }

    #[test]
    fn test_infer_schema() {
        let schema = run(r#"{"name": "Ada", "age": 36}"#, None, false);
        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["properties"]["age"]["type"], json!("integer"));
        assert_eq!(schema["required"], json!([]));
    }

    #[test]
    fn test_infer_field_catalogue() {
        let fields = run(r#"{"email": "ada@example.com"}"#, None, true);
        assert_eq!(fields[0]["name"], json!("email"));
        assert_eq!(fields[0]["type"], json!("string"));
    }

    #[test]
    fn test_invalid_example() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.json");
        std::fs::write(&input, "{not json").unwrap();
        let args = InferArgs {
            input,
            max_depth: None,
            fields: false,
            full: false,
            format: OutputFormat::Json,
            output: None,
        };
        assert!(matches!(
            handle_infer(&args, &InferenceConfig::default()),
            Err(CliError::InferenceError(_))
        ));
    }
}
