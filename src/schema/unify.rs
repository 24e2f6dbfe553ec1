//! Type unifier: the single merge operation the whole pipeline folds through
//!
//! `merge` is total, associative, commutative, and idempotent. Those laws are
//! load-bearing: they are what lets records be folded in any order, including
//! partitioned folds combined at the end, with identical results.

use super::types::MergedNode;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::mem;

/// Merge two observed/merged types into the single type that can represent
/// both.
///
/// Precedence, applied in order:
/// 1. Null is the identity element.
/// 2. Identical variants merge structurally: Structs field-by-field (union of
///    keys, shared keys recurse), Lists by element type, equal scalars to
///    themselves.
/// 3. Integer widens to Float, never the reverse.
/// 4. Any other scalar mismatch falls back to String, the one column type
///    that can still hold every value actually observed.
/// 5. Scalar vs Struct, or anything vs List, resolves the same way: String.
///    A column cannot be both structured and scalar, so this is a deliberate
///    lossy fallback, not an error.
pub fn merge(a: MergedNode, b: MergedNode) -> MergedNode {
    use MergedNode::{Boolean, Float, Integer, List, Null, String, Struct};

    match (a, b) {
        (Null, other) | (other, Null) => other,

        (Boolean, Boolean) => Boolean,
        (Integer, Integer) => Integer,
        (Float, Float) => Float,
        (String, String) => String,
        (List(a), List(b)) => List(Box::new(merge(*a, *b))),
        (Struct(a), Struct(b)) => Struct(merge_struct_fields(a, b)),

        (Integer, Float) | (Float, Integer) => Float,

        _ => String,
    }
}

/// Union of both field maps; fields missing on one side pass through
/// unchanged, shared fields recurse. First-sighting order is preserved:
/// `a`'s fields keep their positions, `b`'s new fields append in their own
/// order.
fn merge_struct_fields(
    mut a: IndexMap<String, MergedNode>,
    b: IndexMap<String, MergedNode>,
) -> IndexMap<String, MergedNode> {
    for (name, b_node) in b {
        match a.entry(name) {
            Entry::Occupied(mut slot) => {
                let a_node = mem::take(slot.get_mut());
                *slot.get_mut() = merge(a_node, b_node);
            }
            Entry::Vacant(slot) => {
                slot.insert(b_node);
            }
        }
    }
    a
}
