//! Typed constructors for catalog nodes
//!
//! All constructors build into the process-wide [`registry`]. They apply no
//! simplification; see [`crate::fold`] for the folding variants.

use crate::catalog::{registry, ExprKind};
use crate::error::{SymError, SymResult};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tessera_core::{Node, Value};

fn make<I, V>(kind: &str, values: I) -> SymResult<Node>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Ok(registry().new_node(kind, values)?)
}

/// `Var(name)`
pub fn var(name: &str) -> SymResult<Node> {
    make("Var", [name])
}

/// `SizeVar(name)`: a variable known to be non-negative
pub fn size_var(name: &str) -> SymResult<Node> {
    make("SizeVar", [name])
}

/// `IntImm(value)`
pub fn int_imm(value: i64) -> SymResult<Node> {
    make("IntImm", [value])
}

/// `FloatImm(value)`
pub fn float_imm(value: f64) -> SymResult<Node> {
    make("FloatImm", [value])
}

/// `StringImm(value)`
pub fn string_imm(value: &str) -> SymResult<Node> {
    make("StringImm", [value])
}

/// `CastDType(value, dtype)`; `dtype` may be a `DType` or a spelling
pub fn cast(value: &Node, dtype: impl Into<Value>) -> SymResult<Node> {
    make("CastDType", [Value::from(value), dtype.into()])
}

/// A binary node of the given kind, without folding
pub fn binary(kind: ExprKind, a: &Node, b: &Node) -> SymResult<Node> {
    if !kind.is_binary() {
        return Err(SymError::NotBinary { kind });
    }
    make(kind.type_name(), [a, b])
}

/// `Not(a)`, without folding
pub fn not(a: &Node) -> SymResult<Node> {
    make("Not", [a])
}

/// `Select(cond, true_value, false_value)`
pub fn select(cond: &Node, true_value: &Node, false_value: &Node) -> SymResult<Node> {
    make("Select", [cond, true_value, false_value])
}

/// `Ramp(base, stride, lanes)`
pub fn ramp(base: &Node, stride: &Node, lanes: &Node) -> SymResult<Node> {
    make("Ramp", [base, stride, lanes])
}

/// `Broadcast(value, lanes)`
pub fn broadcast(value: &Node, lanes: &Node) -> SymResult<Node> {
    make("Broadcast", [value, lanes])
}

/// `Shuffle(vectors, indices)`
pub fn shuffle(vectors: Vec<Node>, indices: Vec<Node>) -> SymResult<Node> {
    make("Shuffle", [Value::from(vectors), Value::from(indices)])
}

/// `Let(var, value, body)`
pub fn let_(var: &Node, value: &Node, body: &Node) -> SymResult<Node> {
    make("Let", [var, value, body])
}

/// `Call(op, args)`; `op` is usually an interned [`op`] node
pub fn call(op: impl Into<Value>, args: Vec<Node>) -> SymResult<Node> {
    make("Call", [op.into(), Value::from(args)])
}

/// `Range(min, extent)`
pub fn range(min: &Node, extent: &Node) -> SymResult<Node> {
    make("Range", [min, extent])
}

/// Name of the `if_then_else` intrinsic
pub const IF_THEN_ELSE: &str = "if_then_else";
/// Name of the `left_shift` intrinsic
pub const LEFT_SHIFT: &str = "left_shift";
/// Name of the `right_shift` intrinsic
pub const RIGHT_SHIFT: &str = "right_shift";
/// Name of the `bitwise_and` intrinsic
pub const BITWISE_AND: &str = "bitwise_and";
/// Name of the `bitwise_or` intrinsic
pub const BITWISE_OR: &str = "bitwise_or";
/// Name of the `bitwise_xor` intrinsic
pub const BITWISE_XOR: &str = "bitwise_xor";
/// Name of the `bitwise_not` intrinsic
pub const BITWISE_NOT: &str = "bitwise_not";

static OPS: Lazy<Mutex<FxHashMap<Arc<str>, Node>>> = Lazy::new(Default::default);

/// The interned `Op(name)`: the same name always yields the same instance
pub fn op(name: &str) -> SymResult<Node> {
    let mut ops = OPS.lock();
    if let Some(existing) = ops.get(name) {
        return Ok(existing.clone());
    }
    let node = make("Op", [name])?;
    tracing::trace!(name, "interned op");
    ops.insert(Arc::from(name), node.clone());
    Ok(node)
}

struct Limits {
    pos_inf: Node,
    neg_inf: Node,
}

static LIMITS: Lazy<Result<Limits, SymError>> = Lazy::new(|| {
    Ok(Limits {
        pos_inf: var("pos_inf")?,
        neg_inf: var("neg_inf")?,
    })
});

fn limits() -> SymResult<&'static Limits> {
    Result::as_ref(&*LIMITS).map_err(Clone::clone)
}

/// Symbolic positive infinity
pub fn pos_inf() -> SymResult<Node> {
    Ok(limits()?.pos_inf.clone())
}

/// Symbolic negative infinity
pub fn neg_inf() -> SymResult<Node> {
    Ok(limits()?.neg_inf.clone())
}

/// Check for the [`pos_inf`] instance itself (not any `Var("pos_inf")`)
pub fn is_pos_inf(expr: &Node) -> bool {
    limits().is_ok_and(|limits| limits.pos_inf.same_as(expr))
}

/// Check for the [`neg_inf`] instance itself
pub fn is_neg_inf(expr: &Node) -> bool {
    limits().is_ok_and(|limits| limits.neg_inf.same_as(expr))
}

/// Integer payload of an `IntImm`
pub fn as_int_imm(expr: &Node) -> Option<i64> {
    if ExprKind::of(expr) != Some(ExprKind::IntImm) {
        return None;
    }
    expr.get_at(0).ok()?.as_int()
}

/// Float payload of a `FloatImm`
pub fn as_float_imm(expr: &Node) -> Option<f64> {
    if ExprKind::of(expr) != Some(ExprKind::FloatImm) {
        return None;
    }
    expr.get_at(0).ok()?.as_float()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::DType;

    #[test]
    fn test_constructor_reprs() {
        let x = var("x").unwrap();
        assert_eq!(x.to_string(), "Var(name='x')");
        assert_eq!(size_var("n").unwrap().to_string(), "SizeVar(name='n')");
        assert_eq!(float_imm(1.5).unwrap().to_string(), "FloatImm(value=1.5)");
        assert_eq!(string_imm("s").unwrap().to_string(), "StringImm(value='s')");
        assert_eq!(
            cast(&x, "float16x4").unwrap().to_string(),
            "CastDType(value=Var(name='x'), dtype=dtype('float16x4'))"
        );
        assert_eq!(
            cast(&x, DType::INT32).unwrap().get("dtype").unwrap(),
            Value::DType(DType::INT32)
        );
    }

    #[test]
    fn test_structural_constructors() {
        let x = var("x").unwrap();
        let one = int_imm(1).unwrap();
        assert_eq!(
            binary(ExprKind::Lt, &x, &one).unwrap().to_string(),
            "LT(a=Var(name='x'), b=IntImm(value=1))"
        );
        assert!(binary(ExprKind::Not, &x, &one).is_err());
        assert_eq!(
            shuffle(vec![x.clone()], vec![one.clone()]).unwrap().to_string(),
            "Shuffle(vectors=[Var(name='x')], indices=[IntImm(value=1)])"
        );
        assert_eq!(
            range(&one, &x).unwrap().to_string(),
            "Range(min=IntImm(value=1), extent=Var(name='x'))"
        );
        assert!(let_(&x, &one, &x).is_ok());
        // Let binds a Var, not an arbitrary expression
        assert!(let_(&one, &one, &x).is_err());
    }

    #[test]
    fn test_range_is_not_an_expr() {
        let one = int_imm(1).unwrap();
        let r = range(&one, &one).unwrap();
        assert!(!r.instance_of("Expr"));
        assert!(not(&r).is_err());
    }

    #[test]
    fn test_op_interning() {
        let a = op("my.op").unwrap();
        let b = op("my.op").unwrap();
        assert!(a.same_as(&b));
        assert!(!a.same_as(&op("other.op").unwrap()));

        let c = call(&a, vec![int_imm(1).unwrap()]).unwrap();
        assert_eq!(c.to_string(), "Call(op=Op(name='my.op'), args=[IntImm(value=1)])");
    }

    #[test]
    fn test_limits_compare_by_identity() {
        let inf = pos_inf().unwrap();
        assert!(is_pos_inf(&inf));
        assert!(!is_neg_inf(&inf));
        assert!(!is_pos_inf(&var("pos_inf").unwrap()));
        assert!(is_neg_inf(&neg_inf().unwrap()));
    }

    #[test]
    fn test_imm_payloads() {
        assert_eq!(as_int_imm(&int_imm(4).unwrap()), Some(4));
        assert_eq!(as_int_imm(&float_imm(4.0).unwrap()), None);
        assert_eq!(as_float_imm(&float_imm(0.25).unwrap()), Some(0.25));
        assert_eq!(as_float_imm(&var("x").unwrap()), None);
    }
}
