//! Validate data against a schema

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use schemaweave_core::validation::{SchemaValidator, ValidationBackend, ValidationConfig, ValidationResult};

use crate::error::CliError;
use crate::input::{display_name, load_input, load_schema};
use crate::output::{OutputFormat, emit};

/// Engine choice on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Auto,
    Library,
    Fallback,
}

impl From<BackendArg> for ValidationBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => ValidationBackend::Auto,
            BackendArg::Library => ValidationBackend::Library,
            BackendArg::Fallback => ValidationBackend::Fallback,
        }
    }
}

/// Arguments for the `validate` command
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Data to validate: an object, or a list of objects (`-` for stdin)
    pub input: PathBuf,
    /// Schema file; normalized before use
    #[arg(short, long)]
    pub schema: PathBuf,
    /// Override the configured validation engine
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,
    /// Print the full report instead of a summary
    #[arg(long)]
    pub report: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Handle the `validate` command
///
/// Returns the result so the caller can choose the exit status.
pub fn handle_validate(args: &ValidateArgs, config: &ValidationConfig) -> Result<ValidationResult, CliError> {
    let mut config = config.clone();
    if let Some(backend) = args.backend {
        config.backend = backend.into();
    }

    let schema = load_schema(&args.schema)?;
    let content = load_input(&args.input)?;
    let validator = SchemaValidator::with_config(config);
    let result = validator.validate_str(&content, &schema)?;

    if args.report {
        emit(&result, args.format, None)?;
    } else {
        print_summary(&result, &display_name(&args.input), validator.engine_name());
    }
    Ok(result)
}

fn print_summary(result: &ValidationResult, source: &str, engine: &str) {
    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }
    if result.valid {
        println!("{}: valid ({})", source, engine);
    } else {
        println!("{}: {} error(s) ({})", source, result.errors.len(), engine);
        for error in &result.errors {
            println!("  {}", error);
        }
    }
}
