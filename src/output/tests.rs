//! Tests for output module

use super::*;
use crate::defaults::ReferenceDefaults;
use crate::schema::arrow_schema_from_rows;
use arrow::array::{Array, Float64Array, Int64Array, ListArray, StringArray, StructArray};
use arrow::datatypes::DataType;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs::File;
use tempfile::tempdir;

fn schema_for(rows: &[serde_json::Value]) -> arrow::datatypes::Schema {
    arrow_schema_from_rows("Test", rows, &ReferenceDefaults::empty()).unwrap()
}

#[test]
fn test_convert_scalars_and_nulls() {
    let rows = vec![
        json!({"id": "a", "n": 1, "ok": true}),
        json!({"id": "b", "n": null}),
    ];
    let schema = schema_for(&rows);
    let batch = json_to_arrow(&rows, &schema).unwrap();

    assert_eq!(batch.num_rows(), 2);

    let ids = batch
        .column_by_name("id")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(ids.value(0), "a");
    assert_eq!(ids.value(1), "b");

    let ns = batch
        .column_by_name("n")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(ns.value(0), 1);
    assert!(ns.is_null(1));

    let oks = batch.column_by_name("ok").unwrap();
    assert!(oks.is_null(1)); // absent key becomes null
}

#[test]
fn test_convert_widened_float_column_accepts_ints() {
    let rows = vec![json!({"n": 1}), json!({"n": 2.5})];
    let schema = schema_for(&rows);
    assert_eq!(
        schema.field_with_name("n").unwrap().data_type(),
        &DataType::Float64
    );

    let batch = json_to_arrow(&rows, &schema).unwrap();
    let ns = batch
        .column_by_name("n")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(ns.value(0), 1.0);
    assert_eq!(ns.value(1), 2.5);
}

#[test]
fn test_convert_fallback_column_stringifies() {
    let rows = vec![json!({"n": 1}), json!({"n": "unknown"})];
    let schema = schema_for(&rows);
    let batch = json_to_arrow(&rows, &schema).unwrap();

    let ns = batch
        .column_by_name("n")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(ns.value(0), "1");
    assert_eq!(ns.value(1), "unknown");
}

#[test]
fn test_convert_nested_list_of_structs() {
    let rows = vec![
        json!({"name": [{"family": "Doe", "given": ["Jane"]}]}),
        json!({"name": []}),
        json!({}),
    ];
    let schema = schema_for(&rows);
    let batch = json_to_arrow(&rows, &schema).unwrap();

    let names = batch
        .column_by_name("name")
        .unwrap()
        .as_any()
        .downcast_ref::<ListArray>()
        .unwrap();
    assert_eq!(names.value_length(0), 1);
    assert_eq!(names.value_length(1), 0);
    assert!(names.is_null(2));

    let items = names.values();
    let structs = items.as_any().downcast_ref::<StructArray>().unwrap();
    let families = structs
        .column_by_name("family")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(families.value(0), "Doe");
}

#[test]
fn test_convert_empty_records() {
    let schema = schema_for(&[json!({"id": "a"})]);
    let batch = json_to_arrow(&[], &schema).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 1);
}

#[test]
fn test_parquet_round_trip() {
    let rows = vec![
        json!({"resourceType": "Patient", "id": "p1", "name": [{"family": "One"}]}),
        json!({"resourceType": "Patient", "id": "p2", "deceasedBoolean": true}),
    ];
    let schema = arrow_schema_from_rows("Patient", &rows, ReferenceDefaults::r4()).unwrap();
    let batch = json_to_arrow(&rows, &schema).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("patients.parquet");
    let written = write_batch_to_parquet(&path, &batch, None).unwrap();
    assert_eq!(written, 2);

    let file = File::open(&path).unwrap();
    let reader = parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let read_back: Vec<_> = reader.map(Result::unwrap).collect();
    let total: usize = read_back.iter().map(arrow::record_batch::RecordBatch::num_rows).sum();
    assert_eq!(total, 2);

    // Widened fields survive the round trip
    assert!(read_back[0].schema().field_with_name("telecom").is_ok());
}

#[test]
fn test_writer_config() {
    let config = ParquetWriterConfig::new()
        .uncompressed()
        .with_row_group_size(100);
    let rows = vec![json!({"id": "x"})];
    let schema = schema_for(&rows);
    let batch = json_to_arrow(&rows, &schema).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("tiny.parquet");
    let mut writer = ParquetWriter::new(&path, &schema, &config).unwrap();
    writer.write(&batch).unwrap();
    assert_eq!(writer.rows_written(), 1);
    assert_eq!(writer.close().unwrap(), 1);
}
