//! DType errors

use thiserror::Error;

/// Result type for dtype normalization
pub type DTypeResult<T> = Result<T, DTypeError>;

/// Errors raised while normalizing a dtype spelling
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DTypeError {
    /// A string spelling does not follow `<kind><bits>[x<lanes>]`
    #[error("Invalid dtype spelling '{spelling}': {reason}")]
    InvalidSpelling {
        /// The rejected spelling
        spelling: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// An array-library dtype that has no triple equivalent
    #[error("Unsupported external dtype: {name}")]
    UnsupportedExternal {
        /// Name reported by the external dtype
        name: String,
    },

    /// A triple component is out of range
    #[error("Invalid dtype {what}: {value}")]
    InvalidComponent {
        /// Which component ("bits" or "lanes")
        what: &'static str,
        /// The rejected value
        value: u64,
    },
}

impl DTypeError {
    pub(crate) fn spelling(spelling: &str, reason: &'static str) -> Self {
        DTypeError::InvalidSpelling {
            spelling: spelling.to_string(),
            reason,
        }
    }
}
