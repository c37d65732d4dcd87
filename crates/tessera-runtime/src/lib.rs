//! Tessera object runtime
//!
//! The runtime owns the memory behind every node instance:
//! - Type tag assignment
//! - Allocation of fixed-size field records
//! - Positional field access
//! - Reference counting and reclamation
//!
//! It knows nothing about field names or schemas; the bridge in
//! `tessera-core` layers those on top.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod heap;
pub mod object;
pub mod tag;
pub mod value;

pub use error::{RuntimeError, RuntimeResult};
pub use heap::{Heap, HeapConfig, HeapStats};
pub use object::ObjRef;
pub use tag::{HeapId, TypeTag};
pub use value::RawValue;
