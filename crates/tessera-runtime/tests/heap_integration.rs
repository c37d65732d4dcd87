//! Integration tests for the object heap
//!
//! Tests cover:
//! - Tag assignment and positional field access
//! - Shared ownership: mutation visible through every handle
//! - Reclamation of object graphs when the last holder releases
//! - Live-object limits and heap isolation

use tessera_dtype::DType;
use tessera_runtime::{Heap, HeapConfig, RawValue, RuntimeError};

#[test]
fn test_mutation_visible_to_all_holders() {
    let heap = Heap::new();
    let tag = heap.assign_type_tag("Cell");
    let obj = heap.alloc(tag, vec![RawValue::Int(0)]).unwrap();
    let alias = heap.retain(&obj);

    heap.set(&obj, 0, RawValue::from("changed")).unwrap();
    assert_eq!(heap.get(&alias, 0).unwrap(), RawValue::from("changed"));
}

#[test]
fn test_nested_graph_reclaimed_once() {
    let heap = Heap::new();
    let leaf_tag = heap.assign_type_tag("Leaf");
    let pair_tag = heap.assign_type_tag("Pair");

    let leaf = heap.alloc(leaf_tag, vec![RawValue::DType(DType::INT32)]).unwrap();
    let pair = heap
        .alloc(
            pair_tag,
            vec![
                RawValue::Object(leaf.clone()),
                RawValue::List(vec![RawValue::Object(leaf.clone())]),
            ],
        )
        .unwrap();
    assert_eq!(leaf.ref_count(), 3);

    heap.release(leaf);
    assert_eq!(heap.stats().live_objects, 2);

    heap.release(pair);
    let stats = heap.stats();
    assert_eq!(stats.live_objects, 0);
    assert_eq!(stats.freed_count, 2);
    assert_eq!(stats.allocation_count, 2);
}

#[test]
fn test_overwritten_child_is_released() {
    let heap = Heap::new();
    let tag = heap.assign_type_tag("Box");
    let inner = heap.alloc(tag, vec![RawValue::None]).unwrap();
    let outer = heap.alloc(tag, vec![RawValue::Object(inner)]).unwrap();
    assert_eq!(heap.stats().live_objects, 2);

    heap.set(&outer, 0, RawValue::None).unwrap();
    assert_eq!(heap.stats().live_objects, 1);
}

#[test]
fn test_limit_failure_allocates_nothing() {
    let heap = Heap::with_config(HeapConfig::with_max_live_objects(1));
    let tag = heap.assign_type_tag("T");
    let _only = heap.alloc(tag, vec![]).unwrap();

    let err = heap.alloc(tag, vec![RawValue::Int(1)]).unwrap_err();
    assert_eq!(err, RuntimeError::HeapLimitExceeded { limit: 1 });
    assert_eq!(heap.stats().allocation_count, 1);
}

#[test]
fn test_set_rejects_foreign_value() {
    let heap_a = Heap::new();
    let heap_b = Heap::new();
    let tag_a = heap_a.assign_type_tag("T");
    let tag_b = heap_b.assign_type_tag("T");
    let a = heap_a.alloc(tag_a, vec![RawValue::None]).unwrap();
    let b = heap_b.alloc(tag_b, vec![]).unwrap();

    let err = heap_a.set(&a, 0, RawValue::Object(b)).unwrap_err();
    assert!(matches!(err, RuntimeError::ForeignHeap { .. }));
    assert_eq!(heap_a.get(&a, 0).unwrap(), RawValue::None);
}
