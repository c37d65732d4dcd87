//! Integration tests for the expression catalog
//!
//! Tests cover:
//! - Catalog scenarios through the public constructors
//! - Structural equality across independently built trees
//! - Folding helpers composed into larger expressions
//! - Rewriting through `substitute`

use tessera_core::{Args, BridgeError, DType, RegistryBuilder, Value};
use tessera_sym::{
    binary, cast, collect_vars, fold, install, int_imm, registry, substitute, var, ExprKind, SymError,
};

#[test]
fn test_add_scenario() {
    let sum = binary(ExprKind::Add, &int_imm(1).unwrap(), &int_imm(2).unwrap()).unwrap();
    assert_eq!(sum.to_string(), "Add(a=IntImm(value=1), b=IntImm(value=2))");
    assert!(sum.instance_of("Expr"));

    let again = binary(ExprKind::Add, &int_imm(1).unwrap(), &int_imm(2).unwrap()).unwrap();
    assert_eq!(sum, again);
    assert!(!sum.same_as(&again));
}

#[test]
fn test_construct_by_keyword() {
    let x = var("x").unwrap();
    let node = registry()
        .construct(
            "CastDType",
            Args::new().kw("dtype", "float32").kw("value", &x),
        )
        .unwrap();
    assert_eq!(node, cast(&x, DType::FLOAT32).unwrap());
    assert!(matches!(
        registry().construct("CastDType", Args::new().arg(&x)),
        Err(BridgeError::Arity { .. })
    ));
}

#[test]
fn test_mutation_breaks_equality() {
    let a = var("x").unwrap();
    let b = var("x").unwrap();
    assert_eq!(a, b);
    b.set("name", "y").unwrap();
    assert_ne!(a, b);
    assert_eq!(b.get("name").unwrap(), Value::from("y"));
}

#[test]
fn test_folding_composes() {
    let x = var("x").unwrap();
    // (x * 1 + 0) stays x
    let expr = fold::add(&fold::mul(&x, &int_imm(1).unwrap()).unwrap(), &int_imm(0).unwrap())
        .unwrap();
    assert!(expr.same_as(&x));

    // floordiv(6 + 4, 3) folds all the way down
    let ten = fold::add(&int_imm(6).unwrap(), &int_imm(4).unwrap()).unwrap();
    assert_eq!(fold::floordiv(&ten, &int_imm(3).unwrap()).unwrap(), int_imm(3).unwrap());

    assert_eq!(
        fold::truncdiv(&x, &int_imm(0).unwrap()).unwrap_err(),
        SymError::DivideByZero
    );
}

#[test]
fn test_substitute_then_fold() {
    let x = var("x").unwrap();
    let y = var("y").unwrap();
    let expr = binary(ExprKind::Mul, &binary(ExprKind::Add, &x, &y).unwrap(), &x).unwrap();
    assert_eq!(collect_vars(&expr).unwrap().len(), 2);

    let bound = substitute(&expr, |v| {
        if v.same_as(&x) {
            Some(int_imm(3).unwrap())
        } else {
            None
        }
    })
    .unwrap();
    assert_eq!(
        bound.to_string(),
        "Mul(a=Add(a=IntImm(value=3), b=Var(name='y')), b=IntImm(value=3))"
    );
    let vars = collect_vars(&bound).unwrap();
    assert_eq!(vars.len(), 1);
    assert!(vars[0].same_as(&y));
}

#[test]
fn test_installed_catalog_reclaims_nodes() {
    let mut builder = RegistryBuilder::new();
    install(&mut builder).unwrap();
    let private = builder.build();
    assert!(!private.ptr_eq(registry()));
    {
        let x = private.new_node("Var", ["x"]).unwrap();
        let _sum = private.new_node("Add", [&x, &x]).unwrap();
        assert_eq!(private.heap().stats().live_objects, 2);
    }
    assert_eq!(private.heap().stats().live_objects, 0);

    // nodes from another registry are refused
    let foreign = var("x").unwrap();
    assert!(private.new_node("Not", [&foreign]).is_err());
}
