//! Schema-driven traversal
//!
//! Children are discovered from each node's field list: fields typed as a
//! node or a list of nodes are walked in declaration order. `Any` fields
//! (such as `Call.op`) are opaque.
//!
//! Visitors recurse once per level of expression depth. Trees tens of
//! thousands of levels deep need a thread with a larger stack; equality,
//! repr and drop of such trees are iterative and have no such limit.

use crate::catalog::ExprKind;
use crate::error::SymResult;
use tessera_core::{FieldType, Node, Value};

/// Read-only expression walker
///
/// Override [`visit`](ExprVisitor::visit) and call [`walk_children`] to
/// continue the descent.
pub trait ExprVisitor {
    /// Visit `node`; the default just descends
    fn visit(&mut self, node: &Node) -> SymResult<()> {
        walk_children(self, node)
    }
}

/// Visit every child of `node` in field order
///
/// Recursion depth follows expression depth, see the module docs.
pub fn walk_children<V: ExprVisitor + ?Sized>(visitor: &mut V, node: &Node) -> SymResult<()> {
    for (index, field) in node.schema().full_fields().iter().enumerate() {
        match field.ty() {
            FieldType::Node(_) => {
                if let Value::Node(child) = node.get_at(index)? {
                    visitor.visit(&child)?;
                }
            }
            FieldType::List(_) => {
                if let Value::List(items) = node.get_at(index)? {
                    for item in &items {
                        if let Value::Node(child) = item {
                            visitor.visit(child)?;
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Rebuilding expression rewriter
///
/// Unchanged subtrees keep their identity: a node whose children all come
/// back as the same instances is returned as is.
pub trait ExprMutator {
    /// Rewrite `node`; the default rewrites its children
    fn mutate(&mut self, node: &Node) -> SymResult<Node> {
        mutate_children(self, node)
    }
}

/// Binding sites (`Let.var`) are not rewritten
fn is_binding(ty: &FieldType) -> bool {
    matches!(ty, FieldType::Node(name) if name.as_ref() == ExprKind::Var.type_name())
}

/// Rewrite every child of `node`, rebuilding it only if something changed
///
/// Recursion depth follows expression depth, see the module docs.
pub fn mutate_children<M: ExprMutator + ?Sized>(mutator: &mut M, node: &Node) -> SymResult<Node> {
    let fields = node.schema().full_fields();
    let mut values = Vec::with_capacity(fields.len());
    let mut changed = false;

    for (index, field) in fields.iter().enumerate() {
        let value = node.get_at(index)?;
        let value = match (field.ty(), value) {
            (ty, Value::Node(child)) if matches!(ty, FieldType::Node(_)) && !is_binding(ty) => {
                let new = mutator.mutate(&child)?;
                changed |= !new.same_as(&child);
                Value::Node(new)
            }
            (FieldType::List(_), Value::List(items)) => {
                let mut rewritten = Vec::with_capacity(items.len());
                for item in items {
                    rewritten.push(match item {
                        Value::Node(child) => {
                            let new = mutator.mutate(&child)?;
                            changed |= !new.same_as(&child);
                            Value::Node(new)
                        }
                        other => other,
                    });
                }
                Value::List(rewritten)
            }
            (_, value) => value,
        };
        values.push(value);
    }

    if !changed {
        return Ok(node.clone());
    }
    tracing::trace!(type_name = node.type_name(), "rebuilt node");
    Ok(node.registry().new_node(node.type_name(), values)?)
}

struct Substitute<F> {
    replace: F,
}

impl<F: FnMut(&Node) -> Option<Node>> ExprMutator for Substitute<F> {
    fn mutate(&mut self, node: &Node) -> SymResult<Node> {
        if node.instance_of(ExprKind::Var.type_name()) {
            if let Some(replacement) = (self.replace)(node) {
                return Ok(replacement);
            }
            return Ok(node.clone());
        }
        mutate_children(self, node)
    }
}

/// Replace variables in `expr` by whatever `replace` maps them to
///
/// Variables for which `replace` returns `None` are kept.
pub fn substitute<F>(expr: &Node, replace: F) -> SymResult<Node>
where
    F: FnMut(&Node) -> Option<Node>,
{
    Substitute { replace }.mutate(expr)
}

/// Distinct variables referenced by `expr`, in first-visit order
pub fn collect_vars(expr: &Node) -> SymResult<Vec<Node>> {
    struct Collect(Vec<Node>);

    impl ExprVisitor for Collect {
        fn visit(&mut self, node: &Node) -> SymResult<()> {
            if node.instance_of(ExprKind::Var.type_name()) {
                if !self.0.iter().any(|seen| seen.same_as(node)) {
                    self.0.push(node.clone());
                }
                return Ok(());
            }
            walk_children(self, node)
        }
    }

    let mut collect = Collect(Vec::new());
    collect.visit(expr)?;
    Ok(collect.0)
}
