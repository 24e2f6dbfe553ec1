//! Schema builder: fold records into one tree, widen it, render it to Arrow

use super::types::{FieldPath, MergedNode, TypeObservation};
use super::unify::merge;
use super::walker::walk;
use crate::defaults::ReferenceDefaults;
use crate::error::{Error, Result};
use arrow::datatypes::{DataType, Field, Fields, Schema};
use indexmap::IndexMap;
use serde_json::Value;
use std::mem;
use std::sync::Arc;
use std::thread;

/// The accumulating schema tree for one record kind.
///
/// Created empty, mutated in place by repeated merges (one per record or per
/// observation), and finalized exactly once into an Arrow [`Schema`]. Every
/// field path ever merged in stays reachable from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTree {
    record_kind: String,
    root: MergedNode,
}

impl SchemaTree {
    /// An empty tree for the given record kind.
    pub fn new(record_kind: impl Into<String>) -> Self {
        Self {
            record_kind: record_kind.into(),
            root: MergedNode::empty_struct(),
        }
    }

    /// The record kind this tree accumulates.
    pub fn record_kind(&self) -> &str {
        &self.record_kind
    }

    /// The merged root node.
    pub fn root(&self) -> &MergedNode {
        &self.root
    }

    /// Walk one record and merge every observation in.
    pub fn add_record(&mut self, record: &Value) -> Result<()> {
        for (path, observation) in walk(record)? {
            self.add_observation(&path, observation);
        }
        Ok(())
    }

    /// Merge a single observation in at its path.
    ///
    /// The path is wrapped into a spine of Struct/List nodes and unified into
    /// the root, so inserting stays associative with every other merge: a
    /// conflicting leaf along the way resolves through the unifier's fallback
    /// rules instead of clobbering anything.
    pub fn add_observation(&mut self, path: &FieldPath, observation: TypeObservation) {
        let spine = wrap_in_spine(path, observation.into());
        let root = mem::take(&mut self.root);
        self.root = merge(root, spine);
    }

    /// Combine a partial tree built from a disjoint subset of records.
    ///
    /// Because the unifier is associative, commutative, and idempotent, a
    /// partitioned fold absorbed in any order equals the sequential fold.
    pub fn absorb(&mut self, other: SchemaTree) {
        debug_assert_eq!(self.record_kind, other.record_kind);
        let root = mem::take(&mut self.root);
        self.root = merge(root, other.root);
    }

    /// Widen the root with the reference defaults for this kind, then render
    /// the tree into an Arrow schema.
    ///
    /// Rendering is pure and total: every node tag is one of the closed set
    /// the unifier can produce, so this never fails. All fields render
    /// nullable; a field known only from the reference table (or observed
    /// only as null) renders as a nullable string column.
    pub fn finish(mut self, defaults: &ReferenceDefaults) -> Schema {
        self.widen(defaults);
        match &self.root {
            MergedNode::Struct(children) => Schema::new(
                children
                    .iter()
                    .map(|(name, node)| render_field(name, node))
                    .collect::<Vec<_>>(),
            ),
            // The root is a struct by construction
            _ => Schema::empty(),
        }
    }

    /// Append reference-default fields missing from the root, in table order.
    /// Unknown kinds widen to nothing; the schema reflects only the samples.
    fn widen(&mut self, defaults: &ReferenceDefaults) {
        let Some(field_names) = defaults.fields(&self.record_kind) else {
            return;
        };
        let MergedNode::Struct(children) = &mut self.root else {
            return;
        };
        for name in field_names {
            if !children.contains_key(name) {
                children.insert(name.clone(), MergedNode::Null);
            }
        }
    }
}

/// Wrap an observation in Struct/List nodes following its path segments, so
/// that merging the result into the root creates any missing intermediate
/// nodes along the way.
fn wrap_in_spine(path: &FieldPath, leaf: MergedNode) -> MergedNode {
    let mut node = leaf;
    for segment in path.segments().iter().rev() {
        if segment.in_list {
            node = MergedNode::List(Box::new(node));
        }
        let mut children = IndexMap::new();
        children.insert(segment.name.clone(), node);
        node = MergedNode::Struct(children);
    }
    node
}

fn render_field(name: &str, node: &MergedNode) -> Field {
    Field::new(name, render_type(node), true)
}

fn render_type(node: &MergedNode) -> DataType {
    match node {
        // No concrete type was ever observed: nullable string column
        MergedNode::Null => DataType::Utf8,
        MergedNode::Boolean => DataType::Boolean,
        MergedNode::Integer => DataType::Int64,
        MergedNode::Float => DataType::Float64,
        MergedNode::String => DataType::Utf8,
        MergedNode::List(element) => {
            DataType::List(Arc::new(Field::new("item", render_type(element), true)))
        }
        // Empty structs upset downstream readers (DuckDB rejects them)
        MergedNode::Struct(children) if children.is_empty() => DataType::Utf8,
        MergedNode::Struct(children) => DataType::Struct(Fields::from(
            children
                .iter()
                .map(|(name, node)| render_field(name, node))
                .collect::<Vec<_>>(),
        )),
    }
}

/// One-shot fold: build the schema for `record_kind` from `rows`.
///
/// An empty `rows` is valid; the result then contains only the
/// reference-widened fields (or nothing at all for an unknown kind).
pub fn arrow_schema_from_rows<'a, I>(
    record_kind: &str,
    rows: I,
    defaults: &ReferenceDefaults,
) -> Result<Schema>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut tree = SchemaTree::new(record_kind);
    for row in rows {
        tree.add_record(row)?;
    }
    Ok(tree.finish(defaults))
}

/// Partitioned fold: split `rows` across `workers` threads, build a partial
/// tree per worker, and absorb the partials at the end.
///
/// Yields the same schema as [`arrow_schema_from_rows`]; the per-record walk
/// dominates on large batches and the few partial-tree merges at the end are
/// contention-free.
pub fn arrow_schema_from_rows_partitioned(
    record_kind: &str,
    rows: &[Value],
    defaults: &ReferenceDefaults,
    workers: usize,
) -> Result<Schema> {
    let workers = workers.max(1);
    if workers == 1 || rows.len() <= 1 {
        return arrow_schema_from_rows(record_kind, rows, defaults);
    }

    let chunk_size = rows.len().div_ceil(workers);
    let partials: Vec<Result<SchemaTree>> = thread::scope(|scope| {
        let handles: Vec<_> = rows
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    let mut tree = SchemaTree::new(record_kind);
                    for row in chunk {
                        tree.add_record(row)?;
                    }
                    Ok(tree)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| Error::Other("schema worker panicked".to_string()))?
            })
            .collect()
    });

    let mut tree = SchemaTree::new(record_kind);
    for partial in partials {
        tree.absorb(partial?);
    }
    Ok(tree.finish(defaults))
}
