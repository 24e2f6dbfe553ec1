//! Error types for fhir-ndjson
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for fhir-ndjson
#[derive(Error, Debug)]
pub enum Error {
    /// A value handed to the schema core was not a JSON object at the root.
    ///
    /// Record-shaped input is the caller's responsibility; type conflicts
    /// *inside* a record are never an error (the unifier is total).
    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid-record error
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }
}

/// Result type alias for fhir-ndjson
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_record("expected a JSON object");
        assert_eq!(err.to_string(), "Invalid record: expected a JSON object");

        let err = Error::output("no batches to write");
        assert_eq!(err.to_string(), "Output error: no batches to write");
    }

    #[test]
    fn test_json_parse_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(err.to_string().starts_with("Failed to parse JSON"));
    }
}
