//! Bridge errors

use tessera_dtype::DTypeError;
use tessera_runtime::RuntimeError;
use thiserror::Error;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors raised while declaring types or working with nodes
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BridgeError {
    /// A type with this name is already registered
    #[error("Type '{type_name}' is already registered")]
    DuplicateType {
        /// Name of the type
        type_name: String,
    },

    /// The declared base type is not registered
    #[error("Unknown base type '{base}' for type '{type_name}'")]
    UnknownBase {
        /// Type being declared
        type_name: String,
        /// Missing base
        base: String,
    },

    /// A field name repeats one of the inherited or own fields
    #[error("Duplicate field '{field}' in type '{type_name}'")]
    DuplicateField {
        /// Type being declared
        type_name: String,
        /// Repeated field name
        field: String,
    },

    /// A node field references a type that is not registered
    #[error("Field '{field}' of type '{type_name}' references unknown type '{referenced}'")]
    UnknownFieldType {
        /// Type being declared
        type_name: String,
        /// Offending field
        field: String,
        /// Missing referenced type
        referenced: String,
    },

    /// Lookup of a type name that was never registered
    #[error("Unknown type '{type_name}'")]
    UnknownType {
        /// Requested name
        type_name: String,
    },

    /// Constructor arguments do not bind to the field list
    #[error("{type_name}(): {reason}")]
    Arity {
        /// Type being constructed
        type_name: String,
        /// What went wrong while binding
        reason: String,
    },

    /// A value does not fit the declared field type
    #[error("Field '{type_name}.{field}' expects {expected}, got {found}")]
    TypeMismatch {
        /// Type owning the field
        type_name: String,
        /// Field name
        field: String,
        /// Declared field type
        expected: String,
        /// Shape of the rejected value
        found: String,
    },

    /// Access to a field the type does not have
    #[error("Type '{type_name}' has no field '{field}'")]
    NoSuchField {
        /// Type of the instance
        type_name: String,
        /// Requested field
        field: String,
    },

    /// Write to a field declared immutable
    #[error("Field '{type_name}.{field}' is immutable")]
    ImmutableField {
        /// Type of the instance
        type_name: String,
        /// Field name
        field: String,
    },

    /// A dtype spelling failed to normalize
    #[error(transparent)]
    DType(#[from] DTypeError),

    /// The object heap refused the operation
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl BridgeError {
    /// Check whether this error comes from a faulty type declaration
    ///
    /// Configuration errors are programming mistakes and are never retried.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            BridgeError::DuplicateType { .. }
                | BridgeError::UnknownBase { .. }
                | BridgeError::DuplicateField { .. }
                | BridgeError::UnknownFieldType { .. }
        )
    }

    pub(crate) fn arity(type_name: &str, reason: impl Into<String>) -> Self {
        BridgeError::Arity {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn no_such_field(type_name: &str, field: &str) -> Self {
        BridgeError::NoSuchField {
            type_name: type_name.to_string(),
            field: field.to_string(),
        }
    }
}
