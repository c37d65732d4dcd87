//! String spellings: `<kind><bits>[x<lanes>]`

use crate::code::DTypeCode;
use crate::dtype::DType;
use crate::error::{DTypeError, DTypeResult};

/// Kind tokens in match order. No token is a prefix of another.
const KINDS: [DTypeCode; 7] = [
    DTypeCode::BFloat,
    DTypeCode::Complex,
    DTypeCode::Float,
    DTypeCode::UInt,
    DTypeCode::Int,
    DTypeCode::Bool,
    DTypeCode::Handle,
];

pub(crate) fn parse(spelling: &str) -> DTypeResult<DType> {
    if spelling == DTypeCode::Void.token() {
        return Ok(DType::VOID);
    }

    let code = KINDS
        .iter()
        .copied()
        .find(|code| spelling.starts_with(code.token()))
        .ok_or_else(|| DTypeError::spelling(spelling, "unknown kind"))?;

    let rest = &spelling[code.token().len()..];
    let (bits_part, lanes_part) = match rest.find('x') {
        Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
        None => (rest, None),
    };

    let bits = if bits_part.is_empty() {
        code.default_bits()
            .ok_or_else(|| DTypeError::spelling(spelling, "missing bit-width"))?
    } else {
        let bits = parse_positive(spelling, bits_part, "bit-width must be a positive integer")?;
        u8::try_from(bits).map_err(|_| DTypeError::spelling(spelling, "bit-width out of range"))?
    };

    let lanes = match lanes_part {
        None => 1,
        Some("") => return Err(DTypeError::spelling(spelling, "missing lane count after 'x'")),
        Some(part) => {
            let lanes = parse_positive(spelling, part, "lane count must be a positive integer")?;
            u16::try_from(lanes).map_err(|_| DTypeError::spelling(spelling, "lane count out of range"))?
        }
    };

    DType::new(code, bits, lanes)
}

fn parse_positive(spelling: &str, digits: &str, reason: &'static str) -> DTypeResult<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DTypeError::spelling(spelling, reason));
    }
    match digits.parse::<u64>() {
        Ok(0) => Err(DTypeError::spelling(spelling, reason)),
        Ok(value) => Ok(value),
        Err(_) => Err(DTypeError::spelling(spelling, "number out of range")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(s: &str) -> (DTypeCode, u8, u16) {
        parse(s).unwrap().as_triple()
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(triple("int8"), (DTypeCode::Int, 8, 1));
        assert_eq!(triple("uint16"), (DTypeCode::UInt, 16, 1));
        assert_eq!(triple("float32"), (DTypeCode::Float, 32, 1));
        assert_eq!(triple("bfloat16"), (DTypeCode::BFloat, 16, 1));
        assert_eq!(triple("complex64"), (DTypeCode::Complex, 64, 1));
    }

    #[test]
    fn test_parse_vectors() {
        assert_eq!(triple("float16x8"), (DTypeCode::Float, 16, 8));
        assert_eq!(triple("int8x4"), (DTypeCode::Int, 8, 4));
        assert_eq!(triple("boolx4"), (DTypeCode::Bool, 8, 4));
    }

    #[test]
    fn test_parse_special_spellings() {
        assert_eq!(triple("bool"), (DTypeCode::Bool, 8, 1));
        assert_eq!(triple("handle"), (DTypeCode::Handle, 64, 1));
        assert_eq!(parse("void").unwrap(), DType::VOID);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "", "bogus", "int", "float", "int0", "int-8", "int+8", "int8x", "int8x0", "int8x-1",
            "int256", "int8x70000", "Int32", "int32 ", "int8x4x2",
        ] {
            assert!(
                matches!(parse(bad), Err(DTypeError::InvalidSpelling { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}
