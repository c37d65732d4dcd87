//! Type codes

use std::fmt;

/// The fixed enumeration of dtype kinds
///
/// Discriminants follow the DLPack numbering so that codes can be exchanged
/// with array libraries verbatim. `Void` has no DLPack counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DTypeCode {
    /// Signed integer
    Int = 0,
    /// Unsigned integer
    UInt = 1,
    /// IEEE floating point
    Float = 2,
    /// Opaque pointer-sized handle
    Handle = 3,
    /// Brain floating point
    BFloat = 4,
    /// Complex floating point
    Complex = 5,
    /// Boolean
    Bool = 6,
    /// Absence of a value
    Void = 255,
}

impl DTypeCode {
    /// Kind token used in string spellings
    pub const fn token(self) -> &'static str {
        match self {
            DTypeCode::Int => "int",
            DTypeCode::UInt => "uint",
            DTypeCode::Float => "float",
            DTypeCode::Handle => "handle",
            DTypeCode::BFloat => "bfloat",
            DTypeCode::Complex => "complex",
            DTypeCode::Bool => "bool",
            DTypeCode::Void => "void",
        }
    }

    /// Numeric value of the code
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a numeric code
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(DTypeCode::Int),
            1 => Some(DTypeCode::UInt),
            2 => Some(DTypeCode::Float),
            3 => Some(DTypeCode::Handle),
            4 => Some(DTypeCode::BFloat),
            5 => Some(DTypeCode::Complex),
            6 => Some(DTypeCode::Bool),
            255 => Some(DTypeCode::Void),
            _ => None,
        }
    }

    /// Bit width implied when a spelling omits it, if the kind allows that
    pub(crate) const fn default_bits(self) -> Option<u8> {
        match self {
            DTypeCode::Bool => Some(8),
            DTypeCode::Handle => Some(64),
            _ => None,
        }
    }
}

impl fmt::Display for DTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            DTypeCode::Int,
            DTypeCode::UInt,
            DTypeCode::Float,
            DTypeCode::Handle,
            DTypeCode::BFloat,
            DTypeCode::Complex,
            DTypeCode::Bool,
            DTypeCode::Void,
        ] {
            assert_eq!(DTypeCode::from_u8(code.as_u8()), Some(code));
        }
        assert_eq!(DTypeCode::from_u8(42), None);
    }

    #[test]
    fn test_default_bits() {
        assert_eq!(DTypeCode::Bool.default_bits(), Some(8));
        assert_eq!(DTypeCode::Handle.default_bits(), Some(64));
        assert_eq!(DTypeCode::Int.default_bits(), None);
    }
}
