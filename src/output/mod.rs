//! Columnar output
//!
//! Converts JSON records into Arrow RecordBatches under an inferred schema
//! and writes Parquet files.

mod convert;
mod writer;

pub use convert::json_to_arrow;
pub use writer::{write_batch_to_parquet, ParquetWriter, ParquetWriterConfig};

#[cfg(test)]
mod tests;
