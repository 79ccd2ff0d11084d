//! Output formatting for CLI

use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::CliError;

/// Serialization format for command output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Render a value in the requested format
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|e| CliError::SerializationError(e.to_string()))
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| CliError::SerializationError(e.to_string()))
        }
    }
}

/// Write rendered output to a file, or stdout when no path is given
pub fn emit<T: Serialize>(value: &T, format: OutputFormat, output: Option<&PathBuf>) -> Result<(), CliError> {
    let rendered = render(value, format)?;
    match output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|e| CliError::FileWriteError(path.clone(), e.to_string()))?;
            eprintln!("Output written to: {}", path.display());
        }
        None => println!("{}", rendered.trim_end()),
    }
    Ok(())
}
