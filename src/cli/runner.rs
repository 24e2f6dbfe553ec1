//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::defaults::ReferenceDefaults;
use crate::error::{Error, Result};
use crate::ndjson::{list_multiline_json_in_dir, read_multiline_json_from_dir};
use crate::output::{json_to_arrow, ParquetWriter, ParquetWriterConfig};
use crate::schema::SchemaTree;
use arrow::datatypes::Schema;
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List { dir } => self.list(dir),
            Commands::Schema {
                dir,
                resource,
                no_widen,
            } => self.schema(dir, resource, *no_widen),
            Commands::Export {
                dir,
                resource,
                output,
                batch_size,
            } => self.export(dir, resource, output, *batch_size),
        }
    }

    fn list(&self, dir: &Path) -> Result<()> {
        let files = list_multiline_json_in_dir(dir, None);
        if files.is_empty() {
            println!("No multi-line JSON files found in {}", dir.display());
            return Ok(());
        }
        for (path, resource_type) in files {
            println!(
                "{}\t{}",
                path.display(),
                resource_type.as_deref().unwrap_or("-")
            );
        }
        Ok(())
    }

    fn schema(&self, dir: &Path, resource: &str, no_widen: bool) -> Result<()> {
        let schema = self.infer(dir, resource, no_widen)?;
        for field in schema.fields() {
            println!("{}: {}", field.name(), field.data_type());
        }
        Ok(())
    }

    fn export(&self, dir: &Path, resource: &str, output: &Path, batch_size: usize) -> Result<()> {
        if batch_size == 0 {
            return Err(Error::output("batch size must be positive"));
        }

        // Two passes over the input: one to infer, one to convert. The data
        // lives on disk anyway and this keeps memory bounded by batch size.
        let schema = self.infer(dir, resource, false)?;

        let config = ParquetWriterConfig::default();
        let mut writer = ParquetWriter::new(output, &schema, &config)?;
        let mut pending: Vec<Value> = Vec::with_capacity(batch_size);
        for record in read_multiline_json_from_dir(dir, Some(&[resource])) {
            pending.push(record);
            if pending.len() == batch_size {
                writer.write(&json_to_arrow(&pending, &schema)?)?;
                pending.clear();
            }
        }
        if !pending.is_empty() {
            writer.write(&json_to_arrow(&pending, &schema)?)?;
        }

        let rows = writer.close()?;
        info!("Wrote {rows} {resource} rows to {}", output.display());
        println!("{rows} rows -> {}", output.display());
        Ok(())
    }

    fn infer(&self, dir: &Path, resource: &str, no_widen: bool) -> Result<Schema> {
        let mut tree = SchemaTree::new(resource);
        let mut count = 0usize;
        for record in read_multiline_json_from_dir(dir, Some(&[resource])) {
            tree.add_record(&record)?;
            count += 1;
        }
        info!("Inferred schema for {resource} from {count} records");

        let empty = ReferenceDefaults::empty();
        let defaults = if no_widen { &empty } else { ReferenceDefaults::r4() };
        Ok(tree.finish(defaults))
    }
}
