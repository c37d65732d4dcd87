//! Identifiers handed out by the runtime

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a declared object type, assigned by a [`Heap`](crate::Heap)
///
/// Tags are dense indices: the n-th type assigned by a heap gets tag `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(u32);

impl TypeTag {
    /// Wrap a raw tag value
    pub const fn from_raw(raw: u32) -> Self {
        TypeTag(raw)
    }

    /// Raw tag value
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Tag as a table index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identifier of a heap within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapId(u64);

impl HeapId {
    /// Create a new unique heap ID
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        HeapId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for HeapId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HeapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
