//! Subcommand handlers

pub mod aggregate;
pub mod infer;
pub mod merge;
pub mod normalize;
pub mod validate;
