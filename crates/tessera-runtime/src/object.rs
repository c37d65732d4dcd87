//! Reference-counted heap objects
//!
//! # Memory Layout
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ strong count (Arc)                      │
//! ├─────────────────────────────────────────┤  ← ObjRef points here
//! │ heap_id: HeapId                         │
//! │ tag: TypeTag                            │
//! │ fields: RwLock<[RawValue]>              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! An [`ObjRef`] is one counted reference. Cloning retains, dropping
//! releases, and the last release reclaims the object together with every
//! reference held in its fields.

use crate::error::{RuntimeError, RuntimeResult};
use crate::heap::HeapCounters;
use crate::tag::{HeapId, TypeTag};
use crate::value::RawValue;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

pub(crate) struct ObjectCell {
    heap_id: HeapId,
    tag: TypeTag,
    fields: RwLock<Box<[RawValue]>>,
    counters: Arc<HeapCounters>,
}

impl Drop for ObjectCell {
    fn drop(&mut self) {
        self.counters.record_free();
        tracing::trace!(tag = %self.tag, heap = %self.heap_id, "reclaimed object");

        // Release children iteratively so long chains don't exhaust the stack
        let mut pending: Vec<RawValue> = std::mem::take(self.fields.get_mut()).into_vec();
        while let Some(value) = pending.pop() {
            match value {
                RawValue::Object(obj) => {
                    if let Some(mut cell) = Arc::into_inner(obj.cell) {
                        pending.extend(std::mem::take(cell.fields.get_mut()).into_vec());
                    }
                }
                RawValue::List(items) => pending.extend(items),
                _ => {}
            }
        }
    }
}

/// Counted handle to a heap object
pub struct ObjRef {
    cell: Arc<ObjectCell>,
}

impl ObjRef {
    pub(crate) fn new(
        heap_id: HeapId,
        tag: TypeTag,
        fields: Vec<RawValue>,
        counters: Arc<HeapCounters>,
    ) -> Self {
        Self {
            cell: Arc::new(ObjectCell {
                heap_id,
                tag,
                fields: RwLock::new(fields.into_boxed_slice()),
                counters,
            }),
        }
    }

    /// Type tag the object was allocated with
    #[inline]
    pub fn tag(&self) -> TypeTag {
        self.cell.tag
    }

    /// Heap that allocated the object
    #[inline]
    pub fn heap_id(&self) -> HeapId {
        self.cell.heap_id
    }

    /// Number of fields
    pub fn field_count(&self) -> usize {
        self.cell.fields.read().len()
    }

    /// Read a field by position
    pub fn get(&self, index: usize) -> RuntimeResult<RawValue> {
        let fields = self.cell.fields.read();
        fields
            .get(index)
            .cloned()
            .ok_or(RuntimeError::FieldIndexOutOfBounds {
                index,
                count: fields.len(),
            })
    }

    /// Overwrite a field by position, returning the previous value
    ///
    /// The caller must make sure no other thread mutates the same object
    /// concurrently if it relies on read-modify-write sequences.
    pub fn set(&self, index: usize, value: RawValue) -> RuntimeResult<RawValue> {
        if let Some(found) = value.foreign_heap(self.heap_id()) {
            return Err(RuntimeError::ForeignHeap {
                expected: self.heap_id(),
                found,
            });
        }
        let mut fields = self.cell.fields.write();
        let count = fields.len();
        let slot = fields
            .get_mut(index)
            .ok_or(RuntimeError::FieldIndexOutOfBounds { index, count })?;
        Ok(std::mem::replace(slot, value))
    }

    /// Borrow all fields without cloning them
    ///
    /// Re-entrant: `f` may read the same object again (e.g. through a cycle).
    pub fn with_fields<R>(&self, f: impl FnOnce(&[RawValue]) -> R) -> R {
        let fields = self.cell.fields.read_recursive();
        f(&fields)
    }

    /// Number of live references to this object
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.cell)
    }

    /// Check whether two handles refer to the same object
    #[inline]
    pub fn ptr_eq(&self, other: &ObjRef) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// Get the address as usize (for identity sets)
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.cell) as usize
    }
}

// Clone is retain
impl Clone for ObjRef {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjRef(tag={}, addr={:#x})", self.tag(), self.addr())
    }
}
