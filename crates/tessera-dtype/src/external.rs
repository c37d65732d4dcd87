//! Array-library dtype objects
//!
//! Array libraries describe element types with a kind character and an item
//! size in bytes (numpy's `dtype.kind` / `dtype.itemsize`). Adapters for a
//! concrete library implement [`ArrayDType`]; this crate only maps the pair
//! onto a triple.

use crate::code::DTypeCode;
use crate::dtype::DType;
use crate::error::{DTypeError, DTypeResult};
use crate::parse;

/// A dtype object supplied by an array library
pub trait ArrayDType {
    /// Kind character: `i`, `u`, `f`, `c`, `b`, or anything else
    fn kind(&self) -> char;

    /// Size of one element in bytes
    fn itemsize(&self) -> usize;

    /// Library-side name, e.g. `"float32"` or `"bfloat16"`
    fn name(&self) -> String {
        format!("{}{}", self.kind(), self.itemsize())
    }
}

pub(crate) fn from_external(dt: &dyn ArrayDType) -> DTypeResult<DType> {
    let code = match dt.kind() {
        'i' => DTypeCode::Int,
        'u' => DTypeCode::UInt,
        'f' => DTypeCode::Float,
        'c' => DTypeCode::Complex,
        'b' => DTypeCode::Bool,
        // Extension dtypes (e.g. bfloat16) report an opaque kind but a canonical name
        _ => {
            let name = dt.name();
            return parse::parse(&name).map_err(|_| DTypeError::UnsupportedExternal { name });
        }
    };

    let bits = dt
        .itemsize()
        .checked_mul(8)
        .and_then(|bits| u8::try_from(bits).ok())
        .filter(|bits| *bits > 0)
        .ok_or_else(|| DTypeError::UnsupportedExternal { name: dt.name() })?;

    DType::new(code, bits, 1)
}
