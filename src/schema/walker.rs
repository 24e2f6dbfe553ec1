//! Path walker: one record in, a flat set of (path, type) observations out

use super::types::{FieldPath, PathSegment, TypeObservation};
use crate::error::{Error, Result};
use indexmap::IndexSet;
use serde_json::Value;

/// Walk one decoded record and produce every (path, type) pair it contains.
///
/// The record must be a JSON object at the root; anything else is a caller
/// error (`Error::InvalidRecord`). Whether a value is a *valid* FHIR resource
/// is established upstream; this function only cares about shape.
///
/// Descent rules:
/// - an object yields one branch per key, path extended by that key
///   (an empty object yields a Null observation: key known, no type evidence)
/// - an array marks the current segment as repeated and descends into each
///   element under that same path; an empty array yields a Null observation
///   at the repeated path, which the unifier treats as "unknown, unify with
///   anything"
/// - scalars classify by value kind; a numeric-looking string stays String
/// - a present `null` yields a Null observation, distinct from an absent key
///   (which yields nothing)
///
/// Pure and deterministic: repeated identical pairs (e.g. from a homogeneous
/// array) are deduplicated, first-seen order is preserved.
pub fn walk(record: &Value) -> Result<Vec<(FieldPath, TypeObservation)>> {
    let Value::Object(fields) = record else {
        return Err(Error::invalid_record(format!(
            "expected a JSON object at the record root, got {}",
            json_kind(record)
        )));
    };

    let mut observations = IndexSet::new();
    for (key, value) in fields {
        descend(&FieldPath::root().child(PathSegment::new(key)), value, &mut observations);
    }
    Ok(observations.into_iter().collect())
}

fn descend(
    path: &FieldPath,
    value: &Value,
    out: &mut IndexSet<(FieldPath, TypeObservation)>,
) {
    match value {
        Value::Object(fields) if !fields.is_empty() => {
            for (key, value) in fields {
                descend(&path.child(PathSegment::new(key)), value, out);
            }
        }
        Value::Array(items) => {
            // Elements share the array's own path; nested arrays flatten
            // onto the same repeated segment.
            let repeated = path.mark_list();
            if items.is_empty() {
                out.insert((repeated, TypeObservation::Null));
            } else {
                for item in items {
                    descend(&repeated, item, out);
                }
            }
        }
        leaf => {
            out.insert((path.clone(), TypeObservation::of_scalar(leaf)));
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
