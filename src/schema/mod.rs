//! Schema inference core
//!
//! Folds heterogeneous FHIR-style JSON records into a single Arrow schema
//! that is simultaneously *wide* (every reference-table top-level field for
//! the record kind) and *deep* (every nested field actually observed).
//!
//! Three pieces, composed as a fold-then-render pipeline:
//!
//! - **walker**: one record → flat set of (path, observed type) pairs
//! - **unify**: merges two observed types under fixed precedence rules;
//!   associative, commutative, idempotent, total
//! - **builder**: folds every observation into one tree, widens the root
//!   from the reference table, renders Arrow
//!
//! The core is computation-only: no I/O and no shared state beyond the
//! accumulating tree, so folds may be partitioned and combined freely.

mod builder;
mod types;
mod unify;
mod walker;

pub use builder::{
    arrow_schema_from_rows, arrow_schema_from_rows_partitioned, SchemaTree,
};
pub use types::{FieldPath, MergedNode, PathSegment, TypeObservation};
pub use unify::merge;
pub use walker::walk;
