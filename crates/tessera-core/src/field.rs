//! Field declarations

use std::fmt;
use std::sync::Arc;
use tessera_runtime::TypeTag;

/// Semantic type of a field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// String
    Str,
    /// Boolean
    Bool,
    /// Canonical dtype (string spellings are normalized on bind)
    DType,
    /// Any value, unchecked
    Any,
    /// Instance of the named type or one of its subtypes
    Node(Arc<str>),
    /// List of instances of the named type or its subtypes
    List(Arc<str>),
}

impl FieldType {
    /// Node reference to `type_name`
    pub fn node(type_name: impl Into<Arc<str>>) -> Self {
        FieldType::Node(type_name.into())
    }

    /// List of node references to `type_name`
    pub fn list(type_name: impl Into<Arc<str>>) -> Self {
        FieldType::List(type_name.into())
    }

    /// Name of the referenced node type, if any
    pub fn referenced_type(&self) -> Option<&str> {
        match self {
            FieldType::Node(name) | FieldType::List(name) => Some(name.as_ref()),
            _ => None,
        }
    }

    /// Check whether values of this field may hold nodes
    pub fn holds_nodes(&self) -> bool {
        matches!(self, FieldType::Node(_) | FieldType::List(_) | FieldType::Any)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Int => f.write_str("int"),
            FieldType::Float => f.write_str("float"),
            FieldType::Str => f.write_str("str"),
            FieldType::Bool => f.write_str("bool"),
            FieldType::DType => f.write_str("dtype"),
            FieldType::Any => f.write_str("any"),
            FieldType::Node(name) => f.write_str(name),
            FieldType::List(name) => write!(f, "list[{name}]"),
        }
    }
}

/// A field as written in a type declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field name
    pub name: Arc<str>,
    /// Declared type
    pub ty: FieldType,
    /// Immutable after construction
    pub frozen: bool,
}

impl FieldDecl {
    /// Mutable field
    pub fn new(name: impl Into<Arc<str>>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            frozen: false,
        }
    }

    /// Mark the field immutable
    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }
}

impl<N: Into<Arc<str>>> From<(N, FieldType)> for FieldDecl {
    fn from((name, ty): (N, FieldType)) -> Self {
        FieldDecl::new(name, ty)
    }
}

/// A field of a registered type, with references resolved to tags
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) name: Arc<str>,
    pub(crate) ty: FieldType,
    pub(crate) target: Option<TypeTag>,
    pub(crate) frozen: bool,
}

impl Field {
    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    /// Tag of the referenced node type
    pub fn target(&self) -> Option<TypeTag> {
        self.target
    }

    /// Whether writes after construction are rejected
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
