//! JSON records to Arrow RecordBatch conversion
//!
//! The schema always comes from the inference core, so only the closed set
//! of types the renderer emits shows up here: Boolean, Int64, Float64, Utf8,
//! List, Struct. Values that don't fit their column (the unifier's String
//! fallback) are stringified rather than dropped.

use crate::error::{Error, Result};
use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, ListArray, StringArray, StructArray,
};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use std::sync::Arc;

/// Convert JSON records to an Arrow RecordBatch under the given schema.
///
/// Keys absent from the schema are ignored; fields absent from a record
/// become nulls.
pub fn json_to_arrow(records: &[Value], schema: &Schema) -> Result<RecordBatch> {
    if records.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(schema.clone())));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let values: Vec<Option<&Value>> = records
            .iter()
            .map(|record| record.get(field.name()))
            .collect();
        columns.push(build_array(&values, field.data_type())?);
    }

    RecordBatch::try_new(Arc::new(schema.clone()), columns)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            // Int64 values land here too when the column was widened
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Utf8 => {
            let arr: StringArray = values.iter().map(|v| v.map(stringify)).collect();
            Ok(Arc::new(arr))
        }

        DataType::List(field) => build_list_array(values, field),

        DataType::Struct(fields) => build_struct_array(values, fields),

        other => Err(Error::output(format!(
            "Unsupported column type {other} (not produced by schema inference)"
        ))),
    }
}

/// String column contents: real strings verbatim, everything else (the
/// unifier's fallback cases) as compact JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn build_list_array(values: &[Option<&Value>], field: &Arc<Field>) -> Result<ArrayRef> {
    let mut items: Vec<Option<&Value>> = Vec::new();
    let mut offsets: Vec<i32> = vec![0];
    let mut validity: Vec<bool> = Vec::with_capacity(values.len());

    for value in values {
        match value {
            Some(Value::Array(elements)) => {
                items.extend(elements.iter().map(Some));
                validity.push(true);
            }
            // A scalar where the schema says repeated: treat as a
            // single-element list rather than losing the value
            Some(other) => {
                items.push(Some(other));
                validity.push(true);
            }
            None => validity.push(false),
        }
        let end = i32::try_from(items.len())
            .map_err(|_| Error::output("Array too large for i32 offsets"))?;
        offsets.push(end);
    }

    let item_array = build_array(&items, field.data_type())?;
    let list = ListArray::new(
        Arc::clone(field),
        OffsetBuffer::new(offsets.into()),
        item_array,
        Some(validity.into()),
    );
    Ok(Arc::new(list))
}

fn build_struct_array(values: &[Option<&Value>], fields: &Fields) -> Result<ArrayRef> {
    let mut children: Vec<ArrayRef> = Vec::with_capacity(fields.len());
    for field in fields {
        let child_values: Vec<Option<&Value>> = values
            .iter()
            .map(|v| v.and_then(|v| v.get(field.name())))
            .collect();
        children.push(build_array(&child_values, field.data_type())?);
    }

    let validity: Vec<bool> = values.iter().map(Option::is_some).collect();
    let arr = StructArray::new(fields.clone(), children, Some(validity.into()));
    Ok(Arc::new(arr))
}
