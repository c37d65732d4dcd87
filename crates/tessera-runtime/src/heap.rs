//! Object heap
//!
//! The heap assigns type tags, allocates objects and keeps allocation
//! statistics. Memory is reclaimed by reference counting: there is no
//! collection pass, an object goes away when its last [`ObjRef`] does.

use crate::error::{RuntimeError, RuntimeResult};
use crate::object::ObjRef;
use crate::tag::{HeapId, TypeTag};
use crate::value::RawValue;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Heap configuration
#[derive(Debug, Clone, Default)]
pub struct HeapConfig {
    /// Maximum number of simultaneously live objects (0 = unlimited)
    pub max_live_objects: usize,
}

impl HeapConfig {
    /// Configuration with a live-object limit
    pub fn with_max_live_objects(max_live_objects: usize) -> Self {
        Self { max_live_objects }
    }
}

/// Heap statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapStats {
    /// Objects currently alive
    pub live_objects: usize,
    /// Objects allocated since the heap was created
    pub allocation_count: usize,
    /// Objects reclaimed since the heap was created
    pub freed_count: usize,
}

#[derive(Debug, Default)]
pub(crate) struct HeapCounters {
    live: AtomicUsize,
    allocated: AtomicUsize,
    freed: AtomicUsize,
}

impl HeapCounters {
    pub(crate) fn record_alloc(&self) {
        self.live.fetch_add(1, Ordering::Relaxed);
        self.allocated.fetch_add(1, Ordering::Relaxed);
    }

    /// Reserve a live slot unless `limit` (non-zero) is reached
    fn try_record_alloc(&self, limit: usize) -> bool {
        if limit == 0 {
            self.record_alloc();
            return true;
        }
        let reserved = self
            .live
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |live| {
                (live < limit).then_some(live + 1)
            })
            .is_ok();
        if reserved {
            self.allocated.fetch_add(1, Ordering::Relaxed);
        }
        reserved
    }

    pub(crate) fn record_free(&self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
        self.freed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> HeapStats {
        HeapStats {
            live_objects: self.live.load(Ordering::Relaxed),
            allocation_count: self.allocated.load(Ordering::Relaxed),
            freed_count: self.freed.load(Ordering::Relaxed),
        }
    }
}

/// Reference-counted object heap
pub struct Heap {
    id: HeapId,
    config: HeapConfig,
    /// Type names indexed by tag
    types: RwLock<Vec<Arc<str>>>,
    counters: Arc<HeapCounters>,
}

impl Heap {
    /// Create an unlimited heap
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    /// Create a heap with the given configuration
    pub fn with_config(config: HeapConfig) -> Self {
        Self {
            id: HeapId::new(),
            config,
            types: RwLock::new(Vec::new()),
            counters: Arc::new(HeapCounters::default()),
        }
    }

    /// Get the heap ID
    pub fn id(&self) -> HeapId {
        self.id
    }

    /// Get the heap configuration
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Assign a fresh tag for a named type
    ///
    /// Every call yields a new tag; uniqueness of names is the caller's
    /// business.
    pub fn assign_type_tag(&self, name: &str) -> TypeTag {
        let mut types = self.types.write();
        let tag = TypeTag::from_raw(types.len() as u32);
        types.push(Arc::from(name));
        tracing::trace!(%tag, name, heap = %self.id, "assigned type tag");
        tag
    }

    /// Name registered for a tag
    pub fn type_name(&self, tag: TypeTag) -> Option<Arc<str>> {
        self.types.read().get(tag.index()).cloned()
    }

    /// Number of assigned type tags
    pub fn type_count(&self) -> usize {
        self.types.read().len()
    }

    /// Allocate an object of type `tag` holding `fields`
    ///
    /// On failure nothing is allocated and `fields` is dropped.
    pub fn alloc(&self, tag: TypeTag, fields: Vec<RawValue>) -> RuntimeResult<ObjRef> {
        if tag.index() >= self.type_count() {
            return Err(RuntimeError::UnknownTypeTag { tag });
        }
        if let Some(found) = fields.iter().find_map(|value| value.foreign_heap(self.id)) {
            return Err(RuntimeError::ForeignHeap {
                expected: self.id,
                found,
            });
        }
        if !self.counters.try_record_alloc(self.config.max_live_objects) {
            return Err(RuntimeError::HeapLimitExceeded {
                limit: self.config.max_live_objects,
            });
        }
        tracing::trace!(%tag, fields = fields.len(), "allocated object");
        Ok(ObjRef::new(self.id, tag, fields, Arc::clone(&self.counters)))
    }

    /// Read field `index` of `obj`
    pub fn get(&self, obj: &ObjRef, index: usize) -> RuntimeResult<RawValue> {
        self.check_owner(obj)?;
        obj.get(index)
    }

    /// Overwrite field `index` of `obj`
    pub fn set(&self, obj: &ObjRef, index: usize, value: RawValue) -> RuntimeResult<()> {
        self.check_owner(obj)?;
        obj.set(index, value).map(drop)
    }

    /// Take an additional reference to `obj`
    pub fn retain(&self, obj: &ObjRef) -> ObjRef {
        obj.clone()
    }

    /// Give up a reference; the last one reclaims the object
    pub fn release(&self, obj: ObjRef) {
        drop(obj);
    }

    /// Type tag of `obj`
    pub fn type_tag_of(&self, obj: &ObjRef) -> TypeTag {
        obj.tag()
    }

    /// Snapshot of the allocation counters
    pub fn stats(&self) -> HeapStats {
        self.counters.snapshot()
    }

    fn check_owner(&self, obj: &ObjRef) -> RuntimeResult<()> {
        if obj.heap_id() == self.id {
            Ok(())
        } else {
            Err(RuntimeError::ForeignHeap {
                expected: self.id,
                found: obj.heap_id(),
            })
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Heap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Heap")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("types", &self.type_count())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_type_tags_sequentially() {
        let heap = Heap::new();
        let a = heap.assign_type_tag("A");
        let b = heap.assign_type_tag("B");
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(heap.type_name(b).as_deref(), Some("B"));
        assert_eq!(heap.type_name(TypeTag::from_raw(9)), None);
    }

    #[test]
    fn test_alloc_unknown_tag() {
        let heap = Heap::new();
        let result = heap.alloc(TypeTag::from_raw(0), vec![]);
        assert!(matches!(result, Err(RuntimeError::UnknownTypeTag { .. })));
        assert_eq!(heap.stats().allocation_count, 0);
    }

    #[test]
    fn test_alloc_get_set() {
        let heap = Heap::new();
        let tag = heap.assign_type_tag("Pair");
        let obj = heap.alloc(tag, vec![RawValue::Int(1), RawValue::Int(2)]).unwrap();

        assert_eq!(heap.type_tag_of(&obj), tag);
        assert_eq!(heap.get(&obj, 1).unwrap(), RawValue::Int(2));
        heap.set(&obj, 1, RawValue::Int(20)).unwrap();
        assert_eq!(heap.get(&obj, 1).unwrap(), RawValue::Int(20));
    }

    #[test]
    fn test_retain_release_stats() {
        let heap = Heap::new();
        let tag = heap.assign_type_tag("Leaf");
        let obj = heap.alloc(tag, vec![]).unwrap();
        let extra = heap.retain(&obj);
        assert_eq!(obj.ref_count(), 2);

        heap.release(extra);
        assert_eq!(heap.stats().live_objects, 1);

        heap.release(obj);
        assert_eq!(
            heap.stats(),
            HeapStats {
                live_objects: 0,
                allocation_count: 1,
                freed_count: 1,
            }
        );
    }

    #[test]
    fn test_release_reclaims_children() {
        let heap = Heap::new();
        let tag = heap.assign_type_tag("Cons");
        let mut tail = heap.alloc(tag, vec![RawValue::None]).unwrap();
        for _ in 0..10_000 {
            tail = heap.alloc(tag, vec![RawValue::Object(tail)]).unwrap();
        }
        assert_eq!(heap.stats().live_objects, 10_001);

        drop(tail);
        assert_eq!(heap.stats().live_objects, 0);
        assert_eq!(heap.stats().freed_count, 10_001);
    }

    #[test]
    fn test_live_object_limit() {
        let heap = Heap::with_config(HeapConfig::with_max_live_objects(2));
        let tag = heap.assign_type_tag("T");
        let a = heap.alloc(tag, vec![]).unwrap();
        let _b = heap.alloc(tag, vec![]).unwrap();
        assert_eq!(
            heap.alloc(tag, vec![]).unwrap_err(),
            RuntimeError::HeapLimitExceeded { limit: 2 }
        );

        drop(a);
        assert!(heap.alloc(tag, vec![]).is_ok());
    }

    #[test]
    fn test_foreign_heap_rejected() {
        let heap_a = Heap::new();
        let heap_b = Heap::new();
        let tag_a = heap_a.assign_type_tag("T");
        let tag_b = heap_b.assign_type_tag("T");

        let from_a = heap_a.alloc(tag_a, vec![]).unwrap();
        let result = heap_b.alloc(tag_b, vec![RawValue::List(vec![RawValue::Object(from_a.clone())])]);
        assert!(matches!(result, Err(RuntimeError::ForeignHeap { .. })));
        assert!(matches!(heap_b.get(&from_a, 0), Err(RuntimeError::ForeignHeap { .. })));
    }
}
