//! Tessera object bridge
//!
//! Declarative node types backed by reference-counted heap objects:
//! - Type registration with single inheritance and field concatenation
//! - Construction from positional and keyword arguments
//! - Checked field reads and writes
//! - Structural equality and a canonical single-line representation
//!
//! Types are declared on a [`RegistryBuilder`] and frozen into a
//! [`Registry`]; every [`Node`] built from a registry stays tied to it.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod args;
mod equal;
pub mod error;
pub mod field;
pub mod node;
pub mod registry;
mod repr;
pub mod schema;
pub mod value;

pub use args::Args;
pub use error::{BridgeError, BridgeResult};
pub use field::{Field, FieldDecl, FieldType};
pub use node::Node;
pub use registry::{Registry, RegistryBuilder, TypeDecl};
pub use schema::TypeSchema;
pub use value::Value;

pub use tessera_dtype::{normalize, DType, DTypeCode};
pub use tessera_runtime::{HeapConfig, HeapStats, TypeTag};
