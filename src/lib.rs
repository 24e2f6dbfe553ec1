// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

//! # fhir-ndjson
//!
//! FHIR NDJSON reading and columnar schema inference.
//!
//! Bulk FHIR exports arrive as piles of multi-line JSON where no two records
//! share the same fields, nesting depth, or even field types. This crate
//! folds such a pile into a single Arrow schema that is *wide* (every
//! top-level field the FHIR spec declares for the resource type, even when
//! absent from the sample) and *deep* (every nested field actually observed,
//! at whatever depth it appeared), then converts the records themselves to
//! Arrow/Parquet under that schema.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fhir_ndjson::{arrow_schema_from_rows, read_multiline_json_from_dir, ReferenceDefaults};
//!
//! let rows: Vec<_> = read_multiline_json_from_dir("exports/", Some(&["Patient"])).collect();
//! let schema = arrow_schema_from_rows("Patient", &rows, ReferenceDefaults::r4())?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ndjson files → schema (walk → unify → build/widen/render) → Arrow/Parquet
//! ```
//!
//! The inference core does no I/O and its merge operation is associative,
//! commutative, and idempotent, so record folds can be partitioned across
//! threads and combined at the end with identical results.

/// Error types for the crate
pub mod error;

/// Schema inference core: walker, unifier, builder
pub mod schema;

/// Per-resource-type top-level field tables
pub mod defaults;

/// NDJSON / JSON Lines discovery and reading
pub mod ndjson;

/// Arrow conversion and Parquet output
pub mod output;

/// Command-line interface
pub mod cli;

pub use defaults::ReferenceDefaults;
pub use error::{Error, Result};
pub use ndjson::{
    list_multiline_json_in_dir, read_multiline_json, read_multiline_json_from_dir,
};
pub use schema::{arrow_schema_from_rows, arrow_schema_from_rows_partitioned, SchemaTree};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
