//! Runtime errors

use crate::tag::{HeapId, TypeTag};

/// Result type for heap operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors raised by the object heap
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RuntimeError {
    /// Allocation with a tag the heap never assigned
    #[error("Unknown type tag: {tag}")]
    UnknownTypeTag {
        /// The rejected tag
        tag: TypeTag,
    },

    /// Positional field access past the end of an object
    #[error("Field index {index} out of bounds (object has {count} fields)")]
    FieldIndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Number of fields in the object
        count: usize,
    },

    /// The heap's live-object limit is reached
    #[error("Heap limit exceeded ({limit} live objects)")]
    HeapLimitExceeded {
        /// Configured limit
        limit: usize,
    },

    /// An object handle from a different heap
    #[error("Object belongs to heap {found}, expected heap {expected}")]
    ForeignHeap {
        /// Heap performing the operation
        expected: HeapId,
        /// Heap that owns the object
        found: HeapId,
    },
}
