//! CLI module
//!
//! # Commands
//!
//! - `list` - Show multi-line JSON files and their detected resource types
//! - `schema` - Infer the Arrow schema for a resource type
//! - `export` - Write records to Parquet under the inferred schema

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
