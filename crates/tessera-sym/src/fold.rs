//! Constant-folding arithmetic
//!
//! Each helper folds when its operands are immediates (or hit an identity
//! such as `x + 0`) and otherwise builds the corresponding node. Integer
//! results that would overflow are not folded. Comparisons and logical
//! operators fold to `IntImm(0)` / `IntImm(1)`.

use crate::catalog::ExprKind;
use crate::error::{SymError, SymResult};
use crate::expr::{
    self, as_float_imm, as_int_imm, binary, call, float_imm, int_imm, is_neg_inf, is_pos_inf,
};
use tessera_core::Node;

/// Immediate operand, if any
#[derive(Clone, Copy)]
enum Imm {
    Int(i64),
    Float(f64),
}

fn imm(expr: &Node) -> Option<Imm> {
    as_int_imm(expr)
        .map(Imm::Int)
        .or_else(|| as_float_imm(expr).map(Imm::Float))
}

fn is_int(expr: &Node, value: i64) -> bool {
    as_int_imm(expr) == Some(value)
}

fn is_float(expr: &Node, value: f64) -> bool {
    as_float_imm(expr) == Some(value)
}

/// `x == value` for either kind of immediate
fn is_const(expr: &Node, value: i64) -> bool {
    is_int(expr, value) || is_float(expr, value as f64)
}

fn boolean(value: bool) -> SymResult<Node> {
    int_imm(i64::from(value))
}

/// Fold two immediates of the same kind with `int` or `float`
fn fold_pair(
    a: &Node,
    b: &Node,
    int: impl FnOnce(i64, i64) -> Option<i64>,
    float: impl FnOnce(f64, f64) -> f64,
) -> SymResult<Option<Node>> {
    match (imm(a), imm(b)) {
        (Some(Imm::Int(x)), Some(Imm::Int(y))) => int(x, y).map(int_imm).transpose(),
        (Some(Imm::Float(x)), Some(Imm::Float(y))) => float_imm(float(x, y)).map(Some),
        _ => Ok(None),
    }
}

fn fold_or_build(kind: ExprKind, a: &Node, b: &Node, folded: Option<Node>) -> SymResult<Node> {
    match folded {
        Some(node) => Ok(node),
        None => binary(kind, a, b),
    }
}

/// `a + b`
pub fn add(a: &Node, b: &Node) -> SymResult<Node> {
    if let Some(node) = fold_pair(a, b, i64::checked_add, |x, y| x + y)? {
        return Ok(node);
    }
    if is_const(a, 0) {
        return Ok(b.clone());
    }
    if is_const(b, 0) {
        return Ok(a.clone());
    }
    binary(ExprKind::Add, a, b)
}

/// `a - b`
pub fn sub(a: &Node, b: &Node) -> SymResult<Node> {
    if let Some(node) = fold_pair(a, b, i64::checked_sub, |x, y| x - y)? {
        return Ok(node);
    }
    if is_const(b, 0) {
        return Ok(a.clone());
    }
    binary(ExprKind::Sub, a, b)
}

/// `a * b`
pub fn mul(a: &Node, b: &Node) -> SymResult<Node> {
    if let Some(node) = fold_pair(a, b, i64::checked_mul, |x, y| x * y)? {
        return Ok(node);
    }
    // x * 1 is x, x * 0 is the zero operand
    if is_const(a, 1) || is_const(b, 0) {
        return Ok(b.clone());
    }
    if is_const(b, 1) || is_const(a, 0) {
        return Ok(a.clone());
    }
    binary(ExprKind::Mul, a, b)
}

/// `-a`
pub fn neg(a: &Node) -> SymResult<Node> {
    match imm(a) {
        Some(Imm::Int(x)) => match x.checked_neg() {
            Some(value) => int_imm(value),
            None => binary(ExprKind::Sub, &int_imm(0)?, a),
        },
        Some(Imm::Float(x)) => float_imm(-x),
        None => sub(&int_imm(0)?, a),
    }
}

fn check_divisor(b: &Node) -> SymResult<()> {
    if is_const(b, 0) {
        Err(SymError::DivideByZero)
    } else {
        Ok(())
    }
}

/// Shared shape of the four division-like folds
fn fold_division(
    kind: ExprKind,
    a: &Node,
    b: &Node,
    int: impl FnOnce(i64, i64) -> Option<i64>,
    float: impl FnOnce(f64, f64) -> f64,
    one_divisor: impl FnOnce(&Node) -> SymResult<Node>,
) -> SymResult<Node> {
    check_divisor(b)?;
    if let Some(node) = fold_pair(a, b, int, float)? {
        return Ok(node);
    }
    if is_const(a, 0) {
        return Ok(a.clone());
    }
    if is_const(b, 1) {
        return one_divisor(a);
    }
    binary(kind, a, b)
}

/// Zero of the same immediate kind as `divisor`
fn zero_like(divisor: &Node) -> SymResult<Node> {
    if as_float_imm(divisor).is_some() {
        float_imm(0.0)
    } else {
        int_imm(0)
    }
}

/// Division rounding toward zero for integers, true division for floats
pub fn truncdiv(a: &Node, b: &Node) -> SymResult<Node> {
    fold_division(ExprKind::Div, a, b, i64::checked_div, |x, y| x / y, |a| Ok(a.clone()))
}

/// Remainder of [`truncdiv`], with the sign of `a`
pub fn truncmod(a: &Node, b: &Node) -> SymResult<Node> {
    fold_division(ExprKind::Mod, a, b, i64::checked_rem, |x, y| x % y, |_| zero_like(b))
}

fn floor_div_i64(x: i64, y: i64) -> Option<i64> {
    let q = x.checked_div(y)?;
    if x % y != 0 && ((x < 0) != (y < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

fn floor_mod_i64(x: i64, y: i64) -> Option<i64> {
    let r = x.checked_rem(y)?;
    if r != 0 && ((r < 0) != (y < 0)) {
        Some(r + y)
    } else {
        Some(r)
    }
}

/// Division rounding toward negative infinity
pub fn floordiv(a: &Node, b: &Node) -> SymResult<Node> {
    fold_division(ExprKind::FloorDiv, a, b, floor_div_i64, |x, y| (x / y).floor(), |a| {
        Ok(a.clone())
    })
}

/// Remainder of [`floordiv`], with the sign of `b`
pub fn floormod(a: &Node, b: &Node) -> SymResult<Node> {
    fold_division(
        ExprKind::FloorMod,
        a,
        b,
        floor_mod_i64,
        |x, y| x - y * (x / y).floor(),
        |_| zero_like(b),
    )
}

/// Division rounding toward positive infinity: `floordiv(a + b - 1, b)`
pub fn ceildiv(a: &Node, b: &Node) -> SymResult<Node> {
    let numerator = sub(&add(a, b)?, &int_imm(1)?)?;
    floordiv(&numerator, b)
}

/// `min(a, b)`, aware of [`pos_inf`](crate::pos_inf) / [`neg_inf`](crate::neg_inf)
pub fn min(a: &Node, b: &Node) -> SymResult<Node> {
    if is_pos_inf(a) || is_neg_inf(b) {
        return Ok(b.clone());
    }
    if is_neg_inf(a) || is_pos_inf(b) {
        return Ok(a.clone());
    }
    let folded = fold_pair(a, b, |x, y| Some(x.min(y)), f64::min)?;
    if folded.is_none() && a.same_as(b) {
        return Ok(a.clone());
    }
    fold_or_build(ExprKind::Min, a, b, folded)
}

/// `max(a, b)`, aware of [`pos_inf`](crate::pos_inf) / [`neg_inf`](crate::neg_inf)
pub fn max(a: &Node, b: &Node) -> SymResult<Node> {
    if is_pos_inf(a) || is_neg_inf(b) {
        return Ok(a.clone());
    }
    if is_neg_inf(a) || is_pos_inf(b) {
        return Ok(b.clone());
    }
    let folded = fold_pair(a, b, |x, y| Some(x.max(y)), f64::max)?;
    if folded.is_none() && a.same_as(b) {
        return Ok(a.clone());
    }
    fold_or_build(ExprKind::Max, a, b, folded)
}

fn compare(
    kind: ExprKind,
    a: &Node,
    b: &Node,
    int: fn(&i64, &i64) -> bool,
    float: fn(&f64, &f64) -> bool,
) -> SymResult<Node> {
    match (imm(a), imm(b)) {
        (Some(Imm::Int(x)), Some(Imm::Int(y))) => boolean(int(&x, &y)),
        (Some(Imm::Float(x)), Some(Imm::Float(y))) => boolean(float(&x, &y)),
        _ => binary(kind, a, b),
    }
}

/// `a > b`
pub fn greater(a: &Node, b: &Node) -> SymResult<Node> {
    compare(ExprKind::Gt, a, b, i64::gt, f64::gt)
}

/// `a >= b`
pub fn greater_equal(a: &Node, b: &Node) -> SymResult<Node> {
    compare(ExprKind::Ge, a, b, i64::ge, f64::ge)
}

/// `a < b`
pub fn less(a: &Node, b: &Node) -> SymResult<Node> {
    compare(ExprKind::Lt, a, b, i64::lt, f64::lt)
}

/// `a <= b`
pub fn less_equal(a: &Node, b: &Node) -> SymResult<Node> {
    compare(ExprKind::Le, a, b, i64::le, f64::le)
}

/// `a == b` as an expression
pub fn equal(a: &Node, b: &Node) -> SymResult<Node> {
    compare(ExprKind::Eq, a, b, i64::eq, f64::eq)
}

/// `a != b` as an expression
pub fn not_equal(a: &Node, b: &Node) -> SymResult<Node> {
    compare(ExprKind::Ne, a, b, i64::ne, f64::ne)
}

/// `a && b`
pub fn logical_and(a: &Node, b: &Node) -> SymResult<Node> {
    match (as_int_imm(a), as_int_imm(b)) {
        (Some(x), _) => Ok(if x != 0 { b.clone() } else { a.clone() }),
        (_, Some(y)) => Ok(if y != 0 { a.clone() } else { b.clone() }),
        _ => binary(ExprKind::And, a, b),
    }
}

/// `a || b`
pub fn logical_or(a: &Node, b: &Node) -> SymResult<Node> {
    match (as_int_imm(a), as_int_imm(b)) {
        (Some(x), _) => Ok(if x != 0 { a.clone() } else { b.clone() }),
        (_, Some(y)) => Ok(if y != 0 { b.clone() } else { a.clone() }),
        _ => binary(ExprKind::Or, a, b),
    }
}

/// `!a`
pub fn logical_not(a: &Node) -> SymResult<Node> {
    match as_int_imm(a) {
        Some(x) => boolean(x == 0),
        None => expr::not(a),
    }
}

/// `cond ? true_value : false_value`, as a call to the `if_then_else` op
pub fn if_then_else(cond: &Node, true_value: &Node, false_value: &Node) -> SymResult<Node> {
    match as_int_imm(cond) {
        Some(0) => Ok(false_value.clone()),
        Some(_) => Ok(true_value.clone()),
        None => call(
            &expr::op(expr::IF_THEN_ELSE)?,
            vec![cond.clone(), true_value.clone(), false_value.clone()],
        ),
    }
}

fn int_operands(a: &Node, b: &Node) -> Option<(i64, i64)> {
    Some((as_int_imm(a)?, as_int_imm(b)?))
}

fn intrinsic(name: &str, args: &[&Node]) -> SymResult<Node> {
    call(&expr::op(name)?, args.iter().map(|&arg| arg.clone()).collect())
}

/// `a >> b` (arithmetic)
pub fn right_shift(a: &Node, b: &Node) -> SymResult<Node> {
    if let Some((x, y)) = int_operands(a, b) {
        if y < 0 {
            return Err(SymError::NegativeShift { amount: y });
        }
        return int_imm(x >> y.min(63));
    }
    intrinsic(expr::RIGHT_SHIFT, &[a, b])
}

/// `a << b`
pub fn left_shift(a: &Node, b: &Node) -> SymResult<Node> {
    if let Some((x, y)) = int_operands(a, b) {
        if y < 0 {
            return Err(SymError::NegativeShift { amount: y });
        }
        if y < 64 {
            let shifted = x << y;
            if shifted >> y == x {
                return int_imm(shifted);
            }
        }
    }
    intrinsic(expr::LEFT_SHIFT, &[a, b])
}

/// `a & b`
pub fn bitwise_and(a: &Node, b: &Node) -> SymResult<Node> {
    match int_operands(a, b) {
        Some((x, y)) => int_imm(x & y),
        None => intrinsic(expr::BITWISE_AND, &[a, b]),
    }
}

/// `a | b`
pub fn bitwise_or(a: &Node, b: &Node) -> SymResult<Node> {
    match int_operands(a, b) {
        Some((x, y)) => int_imm(x | y),
        None => intrinsic(expr::BITWISE_OR, &[a, b]),
    }
}

/// `a ^ b`
pub fn bitwise_xor(a: &Node, b: &Node) -> SymResult<Node> {
    match int_operands(a, b) {
        Some((x, y)) => int_imm(x ^ y),
        None => intrinsic(expr::BITWISE_XOR, &[a, b]),
    }
}

/// `~a`
pub fn bitwise_not(a: &Node) -> SymResult<Node> {
    match as_int_imm(a) {
        Some(x) => int_imm(!x),
        None => intrinsic(expr::BITWISE_NOT, &[a]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{neg_inf, pos_inf, var};

    fn i(value: i64) -> Node {
        int_imm(value).unwrap()
    }

    fn f(value: f64) -> Node {
        float_imm(value).unwrap()
    }

    fn x() -> Node {
        var("x").unwrap()
    }

    #[test]
    fn test_add_folds_and_identities() {
        assert_eq!(add(&i(1), &i(2)).unwrap(), i(3));
        assert_eq!(add(&f(1.5), &f(2.0)).unwrap(), f(3.5));

        let x = x();
        assert!(add(&i(0), &x).unwrap().same_as(&x));
        assert!(add(&x, &f(0.0)).unwrap().same_as(&x));
        assert_eq!(
            add(&x, &i(1)).unwrap().to_string(),
            "Add(a=Var(name='x'), b=IntImm(value=1))"
        );
        // mixed int/float immediates are not folded
        assert_eq!(ExprKind::of(&add(&i(1), &f(1.0)).unwrap()), Some(ExprKind::Add));
    }

    #[test]
    fn test_overflow_is_not_folded() {
        let sum = add(&i(i64::MAX), &i(1)).unwrap();
        assert_eq!(ExprKind::of(&sum), Some(ExprKind::Add));
        let product = mul(&i(i64::MAX), &i(2)).unwrap();
        assert_eq!(ExprKind::of(&product), Some(ExprKind::Mul));
        assert_eq!(ExprKind::of(&neg(&i(i64::MIN)).unwrap()), Some(ExprKind::Sub));
    }

    #[test]
    fn test_sub_mul_neg() {
        let x = x();
        assert_eq!(sub(&i(5), &i(7)).unwrap(), i(-2));
        assert!(sub(&x, &i(0)).unwrap().same_as(&x));
        assert_eq!(ExprKind::of(&sub(&i(0), &x).unwrap()), Some(ExprKind::Sub));

        assert_eq!(mul(&i(3), &i(4)).unwrap(), i(12));
        assert!(mul(&i(1), &x).unwrap().same_as(&x));
        assert!(mul(&x, &i(1)).unwrap().same_as(&x));
        assert_eq!(mul(&x, &i(0)).unwrap(), i(0));

        assert_eq!(neg(&i(3)).unwrap(), i(-3));
        assert_eq!(neg(&f(0.5)).unwrap(), f(-0.5));
        assert_eq!(
            neg(&x).unwrap().to_string(),
            "Sub(a=IntImm(value=0), b=Var(name='x'))"
        );
    }

    #[test]
    fn test_division_family() {
        assert_eq!(truncdiv(&i(-7), &i(2)).unwrap(), i(-3));
        assert_eq!(truncdiv(&f(7.0), &f(2.0)).unwrap(), f(3.5));
        assert_eq!(truncdiv(&f(-7.0), &f(2.0)).unwrap(), f(-3.5));
        assert_eq!(truncmod(&i(-7), &i(2)).unwrap(), i(-1));
        assert_eq!(floordiv(&i(-7), &i(2)).unwrap(), i(-4));
        assert_eq!(floormod(&i(-7), &i(2)).unwrap(), i(1));
        assert_eq!(floormod(&i(7), &i(-2)).unwrap(), i(-1));
        assert_eq!(floordiv(&f(-7.0), &f(2.0)).unwrap(), f(-4.0));
        assert_eq!(floormod(&f(-7.0), &f(2.0)).unwrap(), f(1.0));
        assert_eq!(ceildiv(&i(7), &i(2)).unwrap(), i(4));
        assert_eq!(ceildiv(&i(8), &i(2)).unwrap(), i(4));

        let x = x();
        assert!(truncdiv(&x, &i(1)).unwrap().same_as(&x));
        assert_eq!(truncmod(&x, &i(1)).unwrap(), i(0));
        assert_eq!(floormod(&x, &f(1.0)).unwrap(), f(0.0));
        assert_eq!(ExprKind::of(&floordiv(&x, &i(4)).unwrap()), Some(ExprKind::FloorDiv));
        assert_eq!(ExprKind::of(&ceildiv(&x, &i(4)).unwrap()), Some(ExprKind::FloorDiv));
    }

    #[test]
    fn test_divide_by_zero() {
        let x = x();
        assert_eq!(truncdiv(&x, &i(0)).unwrap_err(), SymError::DivideByZero);
        assert_eq!(truncmod(&i(1), &i(0)).unwrap_err(), SymError::DivideByZero);
        assert_eq!(floordiv(&f(1.0), &f(0.0)).unwrap_err(), SymError::DivideByZero);
        assert_eq!(floormod(&x, &i(0)).unwrap_err(), SymError::DivideByZero);
    }

    #[test]
    fn test_min_max() {
        let x = x();
        assert_eq!(min(&i(3), &i(5)).unwrap(), i(3));
        assert_eq!(max(&f(3.0), &f(5.0)).unwrap(), f(5.0));
        assert!(min(&x, &x).unwrap().same_as(&x));
        assert_eq!(ExprKind::of(&max(&x, &i(1)).unwrap()), Some(ExprKind::Max));

        let inf = pos_inf().unwrap();
        let ninf = neg_inf().unwrap();
        assert!(min(&inf, &x).unwrap().same_as(&x));
        assert!(min(&x, &ninf).unwrap().same_as(&ninf));
        assert!(max(&x, &inf).unwrap().same_as(&inf));
        assert!(max(&ninf, &x).unwrap().same_as(&x));
    }

    #[test]
    fn test_comparisons_fold_to_int() {
        assert_eq!(greater(&i(2), &i(1)).unwrap(), i(1));
        assert_eq!(greater_equal(&i(1), &i(2)).unwrap(), i(0));
        assert_eq!(less(&f(1.0), &f(2.0)).unwrap(), i(1));
        assert_eq!(less_equal(&i(2), &i(2)).unwrap(), i(1));
        assert_eq!(equal(&i(2), &i(3)).unwrap(), i(0));
        assert_eq!(not_equal(&i(2), &i(3)).unwrap(), i(1));
        assert_eq!(
            less(&x(), &i(3)).unwrap().to_string(),
            "LT(a=Var(name='x'), b=IntImm(value=3))"
        );
    }

    #[test]
    fn test_logical() {
        let x = x();
        assert!(logical_and(&i(1), &x).unwrap().same_as(&x));
        assert_eq!(logical_and(&i(0), &x).unwrap(), i(0));
        assert!(logical_or(&i(0), &x).unwrap().same_as(&x));
        assert_eq!(logical_or(&x, &i(1)).unwrap(), i(1));
        assert_eq!(logical_not(&i(0)).unwrap(), i(1));
        assert_eq!(logical_not(&i(5)).unwrap(), i(0));
        assert_eq!(ExprKind::of(&logical_not(&x).unwrap()), Some(ExprKind::Not));
    }

    #[test]
    fn test_if_then_else() {
        let x = x();
        let y = var("y").unwrap();
        assert!(if_then_else(&i(1), &x, &y).unwrap().same_as(&x));
        assert!(if_then_else(&i(0), &x, &y).unwrap().same_as(&y));

        let c = if_then_else(&x, &i(1), &i(2)).unwrap();
        assert_eq!(
            c.to_string(),
            "Call(op=Op(name='if_then_else'), args=[Var(name='x'), IntImm(value=1), IntImm(value=2)])"
        );
        let op = c.get("op").unwrap().into_node().unwrap();
        assert!(op.same_as(&expr::op(expr::IF_THEN_ELSE).unwrap()));
    }

    #[test]
    fn test_shifts_and_bitwise() {
        assert_eq!(left_shift(&i(1), &i(4)).unwrap(), i(16));
        assert_eq!(right_shift(&i(-16), &i(2)).unwrap(), i(-4));
        assert_eq!(right_shift(&i(-1), &i(100)).unwrap(), i(-1));
        assert_eq!(
            left_shift(&i(1), &i(-1)).unwrap_err(),
            SymError::NegativeShift { amount: -1 }
        );
        assert!(right_shift(&i(1), &i(-2)).is_err());
        assert_eq!(ExprKind::of(&left_shift(&i(1), &i(64)).unwrap()), Some(ExprKind::Call));

        assert_eq!(bitwise_and(&i(0b1100), &i(0b1010)).unwrap(), i(0b1000));
        assert_eq!(bitwise_or(&i(0b1100), &i(0b1010)).unwrap(), i(0b1110));
        assert_eq!(bitwise_xor(&i(0b1100), &i(0b1010)).unwrap(), i(0b0110));
        assert_eq!(bitwise_not(&i(0)).unwrap(), i(-1));
        assert_eq!(
            bitwise_not(&x()).unwrap().to_string(),
            "Call(op=Op(name='bitwise_not'), args=[Var(name='x')])"
        );
    }
}
