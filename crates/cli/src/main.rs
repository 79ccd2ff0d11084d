//! SchemaWeave CLI
//!
//! Infers, normalizes, validates, merges and aggregates JSON schemas.

mod commands;
mod config;
mod error;
mod input;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::aggregate::{AggregateArgs, handle_aggregate};
use crate::commands::infer::{InferArgs, handle_infer};
use crate::commands::merge::{MergeArgs, handle_merge};
use crate::commands::normalize::{NormalizeArgs, handle_normalize};
use crate::commands::validate::{ValidateArgs, handle_validate};
use crate::config::EngineConfig;

#[derive(Parser, Debug)]
#[command(name = "swv", version, about = "Schema inference, normalization, validation and merging")]
struct Cli {
    /// TOML file with `[inference]`, `[validation]` and `[aggregation]` sections
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Infer a schema from an example JSON document
    Infer(InferArgs),
    /// Normalize a schema-shaped object
    Normalize(NormalizeArgs),
    /// Validate data against a schema
    Validate(ValidateArgs),
    /// Merge schemas, earlier inputs taking precedence
    Merge(MergeArgs),
    /// Aggregate context from several documents
    Aggregate(AggregateArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "schemaweave_core=debug,swv=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = EngineConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Command::Infer(args) => handle_infer(args, &config.inference)?,
        Command::Normalize(args) => handle_normalize(args)?,
        Command::Validate(args) => {
            let result = handle_validate(args, &config.validation)?;
            if !result.is_valid() {
                std::process::exit(1);
            }
        }
        Command::Merge(args) => handle_merge(args)?,
        Command::Aggregate(args) => handle_aggregate(args, &config.inference, &config.aggregation)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from([
            "swv", "validate", "data.json", "--schema", "schema.json", "--backend", "fallback", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.schema, PathBuf::from("schema.json"));
    }

    #[test]
    fn test_merge_needs_inputs() {
        assert!(Cli::try_parse_from(["swv", "merge"]).is_err());
    }
}
