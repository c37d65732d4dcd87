//! Integration tests for dtype normalization
//!
//! Tests cover:
//! - Canonical triples of common spellings
//! - Idempotence and determinism
//! - Equality / inequality contract
//! - Rejection of malformed spellings

use tessera_dtype::{normalize, DType, DTypeCode, DTypeError};

#[test]
fn test_float16x8_triple() {
    let dt = normalize("float16x8").unwrap();
    assert_eq!(dt.as_triple(), (DTypeCode::Float, 16, 8));
    assert_eq!(dt.code(), DTypeCode::Float);
    assert_eq!(dt.bits(), 16);
    assert_eq!(dt.lanes(), 8);
}

#[test]
fn test_int8_triple() {
    assert_eq!(normalize("int8").unwrap().as_triple(), (DTypeCode::Int, 8, 1));
}

#[test]
fn test_normalize_idempotent_and_deterministic() {
    for spelling in ["float32", "int32", "uint8x16", "bool", "handle", "void"] {
        let first = normalize(spelling).unwrap();
        let second = normalize(spelling).unwrap();
        assert_eq!(first, second);
        assert_eq!(normalize(first).unwrap(), first);
        assert_eq!(normalize(normalize(first).unwrap()).unwrap().as_triple(), first.as_triple());
    }
}

#[test]
fn test_dtype_equality_contract() {
    let int32_a: DType = "int32".parse().unwrap();
    let int32_b: DType = "int32".parse().unwrap();
    let int64: DType = "int64".parse().unwrap();

    assert!(int32_a == int32_b);
    assert!(int32_a != int64);
    // inequality is the negation of equality in both directions
    assert_eq!(int32_a != int64, !(int32_a == int64));
    assert_eq!(int64 != int32_a, !(int64 == int32_a));
}

#[test]
fn test_bogus_spelling_rejected() {
    let err = normalize("bogus").unwrap_err();
    assert!(matches!(err, DTypeError::InvalidSpelling { .. }));
    assert!(err.to_string().contains("bogus"));
}

#[test]
fn test_missing_bits_and_bad_lanes_rejected() {
    assert!(matches!(normalize("float"), Err(DTypeError::InvalidSpelling { .. })));
    assert!(matches!(normalize("int8x0"), Err(DTypeError::InvalidSpelling { .. })));
    assert!(matches!(normalize("uint0"), Err(DTypeError::InvalidSpelling { .. })));
}

#[test]
fn test_owned_string_spelling() {
    let spelling = String::from("int16x2");
    assert_eq!(normalize(&spelling).unwrap().as_triple(), (DTypeCode::Int, 16, 2));
}
