//! Schema core types
//!
//! The closed set of types the inference pipeline operates on: field paths
//! produced by the walker, per-value type observations, and the merged nodes
//! that accumulate into a schema tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a [`FieldPath`].
///
/// `in_list` marks that the values observed at this step sat inside a JSON
/// array. Columnar schemas model "repeated field", not positional slots, so
/// array elements share one path and the flag is all that survives of the
/// index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    /// Object key for this step
    pub name: String,
    /// Whether values at this step were array elements
    pub in_list: bool,
}

impl PathSegment {
    /// A plain mapping-value segment
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            in_list: false,
        }
    }

    /// A segment whose values were array elements
    pub fn repeated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            in_list: true,
        }
    }
}

/// An ordered sequence of key segments from the record root to a field.
///
/// Two paths are equal iff their segment names and list flags are equal.
/// Paths are immutable once emitted by the walker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path (the record root)
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// A copy of this path with one more segment appended
    #[must_use]
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// A copy of this path with the last segment's list flag set.
    ///
    /// Used when descent meets an array: the elements share the path of the
    /// array itself. Flattening a nested array onto an already flagged
    /// segment is a no-op.
    #[must_use]
    pub fn mark_list(&self) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            last.in_list = true;
        }
        Self { segments }
    }

    /// The path's segments, root first
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    /// Dotted rendering with `[]` marking repeated segments,
    /// e.g. `extension[].valueCoding.system`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment.name)?;
            if segment.in_list {
                write!(f, "[]")?;
            }
        }
        Ok(())
    }
}

/// The type deduced from one concrete JSON value at one path in one record.
///
/// Scalars are classified by value kind, never by textual appearance: a
/// numeric-looking string stays `String` (coercion is the unifier's job).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeObservation {
    /// A JSON `null` (or a container with no type evidence)
    Null,
    Boolean,
    Integer,
    Float,
    String,
    /// An array; holds the element observation
    List(Box<TypeObservation>),
    /// An object; fields in first-sighting order
    Struct(Vec<(String, TypeObservation)>),
}

impl TypeObservation {
    /// Classify a single scalar JSON value.
    ///
    /// Arrays and objects are the walker's business (they extend paths rather
    /// than producing container observations), so they map to `Null` here:
    /// "present, but no scalar type evidence".
    pub fn of_scalar(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) => {
                if n.is_f64() {
                    Self::Float
                } else {
                    Self::Integer
                }
            }
            Value::String(_) => Self::String,
        }
    }
}

/// The accumulating unit of the schema tree: the union of every observation
/// seen so far at one point of the tree.
///
/// Struct children are insertion-ordered by first sighting; that ordering is
/// part of the contract and flows through to the rendered schema. A `List`
/// node holds the single merged element node.
#[derive(Debug, Clone, Default)]
pub enum MergedNode {
    /// No type evidence yet; the identity element of the unifier
    #[default]
    Null,
    Boolean,
    Integer,
    Float,
    String,
    List(Box<MergedNode>),
    Struct(IndexMap<String, MergedNode>),
}

impl MergedNode {
    /// An empty struct node
    pub fn empty_struct() -> Self {
        Self::Struct(IndexMap::new())
    }

    /// Whether this node is the Null identity
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Equality up to struct field order.
///
/// First-sighting order is deterministic for a given fold order, but the
/// unifier promises `merge(a, b) == merge(b, a)`, so `==` must not care which
/// side a field was first seen on.
impl PartialEq for MergedNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null)
            | (Self::Boolean, Self::Boolean)
            | (Self::Integer, Self::Integer)
            | (Self::Float, Self::Float)
            | (Self::String, Self::String) => true,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => {
                a.len() == b.len() && a.iter().all(|(name, node)| b.get(name) == Some(node))
            }
            _ => false,
        }
    }
}

impl Eq for MergedNode {}

impl From<TypeObservation> for MergedNode {
    fn from(observation: TypeObservation) -> Self {
        match observation {
            TypeObservation::Null => Self::Null,
            TypeObservation::Boolean => Self::Boolean,
            TypeObservation::Integer => Self::Integer,
            TypeObservation::Float => Self::Float,
            TypeObservation::String => Self::String,
            TypeObservation::List(element) => Self::List(Box::new((*element).into())),
            TypeObservation::Struct(fields) => Self::Struct(
                fields
                    .into_iter()
                    .map(|(name, obs)| (name, obs.into()))
                    .collect(),
            ),
        }
    }
}
