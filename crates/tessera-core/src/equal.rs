//! Structural equality
//!
//! Two nodes are equal when they have the same concrete type and all fields
//! compare equal, recursing into node and list fields. The relation is
//! co-inductive: a pair of objects already being compared higher up the
//! walk is assumed equal, which makes cyclic graphs terminate.
//!
//! The walk keeps its pending comparisons on an explicit stack, so nesting
//! depth is bounded by memory rather than by the thread's stack.

use crate::node::Node;
use rustc_hash::FxHashSet;
use tessera_runtime::RawValue;

/// Pair of object addresses under comparison
type PairKey = (usize, usize);

enum Step {
    Compare(RawValue, RawValue),
    /// All fields of the pair have been compared
    Leave(PairKey),
}

pub(crate) fn nodes_equal(a: &Node, b: &Node) -> bool {
    let mut active: FxHashSet<PairKey> = FxHashSet::default();
    let mut steps = vec![Step::Compare(
        RawValue::Object(a.obj().clone()),
        RawValue::Object(b.obj().clone()),
    )];

    while let Some(step) = steps.pop() {
        match step {
            Step::Leave(key) => {
                active.remove(&key);
            }
            Step::Compare(RawValue::Object(x), RawValue::Object(y)) => {
                if x.ptr_eq(&y) {
                    continue;
                }
                if x.tag() != y.tag() || x.heap_id() != y.heap_id() {
                    return false;
                }
                let key = (x.addr(), y.addr());
                if !active.insert(key) {
                    tracing::warn!(tag = %x.tag(), "cycle detected during structural equality");
                    continue;
                }
                let lhs = x.with_fields(|fields| fields.to_vec());
                let rhs = y.with_fields(|fields| fields.to_vec());
                if lhs.len() != rhs.len() {
                    return false;
                }
                steps.push(Step::Leave(key));
                // reversed so fields are compared in schema order
                steps.extend(lhs.into_iter().zip(rhs).rev().map(|(l, r)| Step::Compare(l, r)));
            }
            Step::Compare(RawValue::List(xs), RawValue::List(ys)) => {
                if xs.len() != ys.len() {
                    return false;
                }
                steps.extend(xs.into_iter().zip(ys).rev().map(|(l, r)| Step::Compare(l, r)));
            }
            Step::Compare(x, y) => {
                if x != y {
                    return false;
                }
            }
        }
    }
    true
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        nodes_equal(self, other)
    }
}
