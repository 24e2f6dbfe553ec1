//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FHIR NDJSON schema inference and Parquet export
#[derive(Parser, Debug)]
#[command(name = "fhir-ndjson")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List multi-line JSON files and their detected resource types
    List {
        /// Directory to scan
        dir: PathBuf,
    },

    /// Infer the Arrow schema for a resource type from NDJSON samples
    Schema {
        /// Directory to scan
        dir: PathBuf,

        /// FHIR resource type (e.g. Patient)
        #[arg(short, long)]
        resource: String,

        /// Skip widening with the built-in FHIR R4 field table
        #[arg(long)]
        no_widen: bool,
    },

    /// Read NDJSON and write a Parquet file under the inferred schema
    Export {
        /// Directory to scan
        dir: PathBuf,

        /// FHIR resource type (e.g. Patient)
        #[arg(short, long)]
        resource: String,

        /// Output Parquet path
        #[arg(short, long)]
        output: PathBuf,

        /// Records per written batch
        #[arg(long, default_value = "10000")]
        batch_size: usize,
    },
}
