//! Tessera numeric type descriptors
//!
//! A [`DType`] is the canonical `(code, bits, lanes)` triple used as a field
//! type throughout the object model. Spellings coming from different places
//! (strings such as `"float16x8"`, array-library dtype objects, existing
//! descriptors) are funnelled through [`normalize`].
//!
//! ```
//! use tessera_dtype::{normalize, DTypeCode};
//!
//! let dt = normalize("float16x8").unwrap();
//! assert_eq!(dt.code(), DTypeCode::Float);
//! assert_eq!(dt.bits(), 16);
//! assert_eq!(dt.lanes(), 8);
//! assert_eq!(dt.to_string(), "float16x8");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod code;
pub mod dtype;
pub mod error;
pub mod external;
mod parse;

pub use code::DTypeCode;
pub use dtype::{normalize, DType, DTypeSpelling};
pub use error::{DTypeError, DTypeResult};
pub use external::ArrayDType;
