//! Merge schemas from several sources

use std::path::PathBuf;

use clap::Args;
use schemaweave_core::{Schema, merge_all, normalize};

use crate::error::CliError;
use crate::input::load_schema;
use crate::output::{OutputFormat, emit};

/// Arguments for the `merge` command
#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Schema files, highest precedence first
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Output file path (stdout if not provided)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the `merge` command
pub fn handle_merge(args: &MergeArgs) -> Result<(), CliError> {
    let schemas = args
        .inputs
        .iter()
        .map(|path| load_schema(path).map(|schema| normalize(&schema)))
        .collect::<Result<Vec<Schema>, CliError>>()?;

    eprintln!("Merging {} schema(s)", schemas.len());
    let merged = merge_all(&schemas);
    emit(&merged, args.format, args.output.as_ref())
}
