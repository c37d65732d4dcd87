//! The canonical dtype triple and normalization

use crate::code::DTypeCode;
use crate::error::{DTypeError, DTypeResult};
use crate::external::{self, ArrayDType};
use crate::parse;
use std::fmt;
use std::str::FromStr;

/// Canonical numeric type descriptor
///
/// Equality is componentwise over `(code, bits, lanes)`; `!=` is derived from
/// the same comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DType {
    code: DTypeCode,
    bits: u8,
    lanes: u16,
}

impl DType {
    /// `void`: the one descriptor with zero bits and zero lanes
    pub const VOID: DType = DType::raw(DTypeCode::Void, 0, 0);
    /// `bool`
    pub const BOOL: DType = DType::raw(DTypeCode::Bool, 8, 1);
    /// `handle`
    pub const HANDLE: DType = DType::raw(DTypeCode::Handle, 64, 1);
    /// `int8`
    pub const INT8: DType = DType::raw(DTypeCode::Int, 8, 1);
    /// `int16`
    pub const INT16: DType = DType::raw(DTypeCode::Int, 16, 1);
    /// `int32`
    pub const INT32: DType = DType::raw(DTypeCode::Int, 32, 1);
    /// `int64`
    pub const INT64: DType = DType::raw(DTypeCode::Int, 64, 1);
    /// `uint8`
    pub const UINT8: DType = DType::raw(DTypeCode::UInt, 8, 1);
    /// `uint32`
    pub const UINT32: DType = DType::raw(DTypeCode::UInt, 32, 1);
    /// `uint64`
    pub const UINT64: DType = DType::raw(DTypeCode::UInt, 64, 1);
    /// `float16`
    pub const FLOAT16: DType = DType::raw(DTypeCode::Float, 16, 1);
    /// `float32`
    pub const FLOAT32: DType = DType::raw(DTypeCode::Float, 32, 1);
    /// `float64`
    pub const FLOAT64: DType = DType::raw(DTypeCode::Float, 64, 1);

    const fn raw(code: DTypeCode, bits: u8, lanes: u16) -> Self {
        Self { code, bits, lanes }
    }

    /// Build a descriptor from its components
    ///
    /// `bits` and `lanes` must be positive. `Void` ignores both and always
    /// yields [`DType::VOID`].
    pub fn new(code: DTypeCode, bits: u8, lanes: u16) -> DTypeResult<Self> {
        if code == DTypeCode::Void {
            return Ok(Self::VOID);
        }
        if bits == 0 {
            return Err(DTypeError::InvalidComponent { what: "bits", value: 0 });
        }
        if lanes == 0 {
            return Err(DTypeError::InvalidComponent { what: "lanes", value: 0 });
        }
        Ok(Self::raw(code, bits, lanes))
    }

    /// Build a descriptor from a numeric triple as stored by array libraries
    pub fn from_triple(code: u8, bits: u8, lanes: u16) -> DTypeResult<Self> {
        let code = DTypeCode::from_u8(code).ok_or(DTypeError::InvalidComponent {
            what: "code",
            value: u64::from(code),
        })?;
        Self::new(code, bits, lanes)
    }

    /// Type code
    #[inline]
    pub const fn code(&self) -> DTypeCode {
        self.code
    }

    /// Bit width of one lane
    #[inline]
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Number of lanes (1 for scalars)
    #[inline]
    pub const fn lanes(&self) -> u16 {
        self.lanes
    }

    /// The `(code, bits, lanes)` triple
    #[inline]
    pub const fn as_triple(&self) -> (DTypeCode, u8, u16) {
        (self.code, self.bits, self.lanes)
    }

    /// Same element type with a different lane count
    pub fn with_lanes(self, lanes: u16) -> DTypeResult<Self> {
        Self::new(self.code, self.bits, lanes)
    }

    /// Scalar element type of a vector dtype
    pub fn element(self) -> Self {
        if self.is_void() {
            return self;
        }
        Self::raw(self.code, self.bits, 1)
    }

    /// Storage size in bytes, rounded up
    pub fn bytes(&self) -> usize {
        (usize::from(self.bits) * usize::from(self.lanes)).div_ceil(8)
    }

    /// Check for a single lane
    pub const fn is_scalar(&self) -> bool {
        self.lanes == 1
    }

    /// Check for a fixed-width vector
    pub const fn is_vector(&self) -> bool {
        self.lanes > 1
    }

    /// Check for `void`
    pub fn is_void(&self) -> bool {
        self.code == DTypeCode::Void
    }

    /// Check for a signed integer
    pub fn is_int(&self) -> bool {
        self.code == DTypeCode::Int
    }

    /// Check for an unsigned integer
    pub fn is_uint(&self) -> bool {
        self.code == DTypeCode::UInt
    }

    /// Check for any floating point kind
    pub fn is_float(&self) -> bool {
        matches!(self.code, DTypeCode::Float | DTypeCode::BFloat)
    }

    /// Check for a boolean
    pub fn is_bool(&self) -> bool {
        self.code == DTypeCode::Bool
    }

    /// Check for an opaque handle
    pub fn is_handle(&self) -> bool {
        self.code == DTypeCode::Handle
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_void() {
            return f.write_str(DTypeCode::Void.token());
        }
        f.write_str(self.code.token())?;
        if self.code.default_bits() != Some(self.bits) {
            write!(f, "{}", self.bits)?;
        }
        if self.lanes != 1 {
            write!(f, "x{}", self.lanes)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DType({self})")
    }
}

impl FromStr for DType {
    type Err = DTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse(s)
    }
}

impl TryFrom<&str> for DType {
    type Error = DTypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        parse::parse(s)
    }
}

/// Any accepted way of spelling a dtype
#[derive(Clone, Copy)]
pub enum DTypeSpelling<'a> {
    /// `"int32"`, `"float16x8"`, `"bool"`, ...
    Str(&'a str),
    /// An array-library dtype object
    External(&'a dyn ArrayDType),
    /// An already canonical descriptor
    Canonical(DType),
}

impl<'a> From<&'a str> for DTypeSpelling<'a> {
    fn from(s: &'a str) -> Self {
        DTypeSpelling::Str(s)
    }
}

impl<'a> From<&'a String> for DTypeSpelling<'a> {
    fn from(s: &'a String) -> Self {
        DTypeSpelling::Str(s.as_str())
    }
}

impl<'a> From<&'a dyn ArrayDType> for DTypeSpelling<'a> {
    fn from(dt: &'a dyn ArrayDType) -> Self {
        DTypeSpelling::External(dt)
    }
}

impl From<DType> for DTypeSpelling<'_> {
    fn from(dt: DType) -> Self {
        DTypeSpelling::Canonical(dt)
    }
}

impl From<&DType> for DTypeSpelling<'_> {
    fn from(dt: &DType) -> Self {
        DTypeSpelling::Canonical(*dt)
    }
}

/// Normalize any dtype spelling into its canonical descriptor
///
/// Pure and deterministic; normalizing a [`DType`] returns it unchanged, so
/// `normalize(normalize(x)?) == normalize(x)`.
pub fn normalize<'a>(spelling: impl Into<DTypeSpelling<'a>>) -> DTypeResult<DType> {
    match spelling.into() {
        DTypeSpelling::Str(s) => parse::parse(s),
        DTypeSpelling::External(dt) => external::from_external(dt),
        DTypeSpelling::Canonical(dt) => Ok(dt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_components() {
        assert!(DType::new(DTypeCode::Int, 0, 1).is_err());
        assert!(DType::new(DTypeCode::Int, 32, 0).is_err());
        assert_eq!(DType::new(DTypeCode::Void, 7, 7).unwrap(), DType::VOID);
    }

    #[test]
    fn test_from_triple() {
        assert_eq!(DType::from_triple(2, 32, 1).unwrap(), DType::FLOAT32);
        assert!(matches!(
            DType::from_triple(9, 32, 1),
            Err(DTypeError::InvalidComponent { what: "code", value: 9 })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(DType::INT32.to_string(), "int32");
        assert_eq!(DType::BOOL.to_string(), "bool");
        assert_eq!(DType::HANDLE.to_string(), "handle");
        assert_eq!(DType::VOID.to_string(), "void");
        assert_eq!(DType::FLOAT16.with_lanes(8).unwrap().to_string(), "float16x8");
        assert_eq!(DType::new(DTypeCode::Bool, 1, 1).unwrap().to_string(), "bool1");
        assert_eq!(format!("{:?}", DType::INT8), "DType(int8)");
    }

    #[test]
    fn test_display_parses_back() {
        for s in ["int8", "uint64x2", "float16x8", "bfloat16", "bool", "boolx4", "handle", "void"] {
            let dt: DType = s.parse().unwrap();
            assert_eq!(dt.to_string(), s);
            assert_eq!(dt.to_string().parse::<DType>().unwrap(), dt);
        }
    }

    #[test]
    fn test_equality_is_componentwise() {
        let a = normalize("int32").unwrap();
        let b = normalize("int32").unwrap();
        let c = normalize("int64").unwrap();
        assert!(a == b);
        assert!(!(a != b));
        assert!(a != c);
        assert!(!(a == c));
        assert_ne!(DType::INT32, DType::UINT32);
        assert_ne!(DType::INT32, DType::INT32.with_lanes(4).unwrap());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("float32").unwrap();
        let twice = normalize(once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(normalize(&twice).unwrap(), once);
    }

    #[test]
    fn test_bytes_and_predicates() {
        assert_eq!(DType::FLOAT32.bytes(), 4);
        assert_eq!(DType::new(DTypeCode::Bool, 1, 4).unwrap().bytes(), 1);
        assert_eq!(DType::VOID.bytes(), 0);
        assert!(DType::INT8.is_scalar());
        assert!(DType::INT8.with_lanes(4).unwrap().is_vector());
        assert_eq!(DType::INT8.with_lanes(4).unwrap().element(), DType::INT8);
        assert!(normalize("bfloat16").unwrap().is_float());
    }
}
