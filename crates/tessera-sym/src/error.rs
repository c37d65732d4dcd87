//! Symbolic helper errors

use crate::catalog::ExprKind;
use tessera_core::BridgeError;
use thiserror::Error;

/// Result type for symbolic helpers
pub type SymResult<T> = Result<T, SymError>;

/// Errors raised while building or folding expressions
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SymError {
    /// Division or modulo by a constant zero
    #[error("Divide by zero")]
    DivideByZero,

    /// Constant shift by a negative amount
    #[error("Shift amount must be non-negative, but got: {amount}")]
    NegativeShift {
        /// The rejected amount
        amount: i64,
    },

    /// A binary constructor was asked for a non-binary kind
    #[error("{kind} is not a binary node")]
    NotBinary {
        /// The requested kind
        kind: ExprKind,
    },

    /// Node construction failed
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
