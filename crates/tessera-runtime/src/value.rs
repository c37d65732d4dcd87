//! Values stored in object slots

use crate::object::ObjRef;
use crate::tag::HeapId;
use std::fmt;
use std::sync::Arc;
use tessera_dtype::DType;

/// A value as stored in an object field
///
/// Object handles inside a `RawValue` are owning: cloning the value retains
/// every object it references, dropping it releases them.
#[derive(Clone)]
pub enum RawValue {
    /// No value (only meaningful for untyped fields)
    None,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Immutable UTF-8 string
    Str(Arc<str>),
    /// Canonical dtype
    DType(DType),
    /// Handle to another heap object
    Object(ObjRef),
    /// Ordered sequence of values
    List(Vec<RawValue>),
}

impl RawValue {
    /// Short name of the value's shape, for diagnostics
    pub const fn kind_name(&self) -> &'static str {
        match self {
            RawValue::None => "none",
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Float(_) => "float",
            RawValue::Str(_) => "str",
            RawValue::DType(_) => "dtype",
            RawValue::Object(_) => "object",
            RawValue::List(_) => "list",
        }
    }

    /// Extract an object handle
    pub fn as_object(&self) -> Option<&ObjRef> {
        match self {
            RawValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Find the first object (depth-first through lists) not owned by `heap`
    pub(crate) fn foreign_heap(&self, heap: HeapId) -> Option<HeapId> {
        match self {
            RawValue::Object(obj) if obj.heap_id() != heap => Some(obj.heap_id()),
            RawValue::List(items) => items.iter().find_map(|item| item.foreign_heap(heap)),
            _ => None,
        }
    }
}

impl Default for RawValue {
    fn default() -> Self {
        RawValue::None
    }
}

// Objects compare by identity, everything else by value
impl PartialEq for RawValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RawValue::None, RawValue::None) => true,
            (RawValue::Bool(a), RawValue::Bool(b)) => a == b,
            (RawValue::Int(a), RawValue::Int(b)) => a == b,
            (RawValue::Float(a), RawValue::Float(b)) => a == b,
            (RawValue::Str(a), RawValue::Str(b)) => a == b,
            (RawValue::DType(a), RawValue::DType(b)) => a == b,
            (RawValue::Object(a), RawValue::Object(b)) => a.ptr_eq(b),
            (RawValue::List(a), RawValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::None => write!(f, "none"),
            RawValue::Bool(b) => write!(f, "bool({b})"),
            RawValue::Int(i) => write!(f, "int({i})"),
            RawValue::Float(x) => write!(f, "float({x:?})"),
            RawValue::Str(s) => write!(f, "str({s:?})"),
            RawValue::DType(dt) => write!(f, "{dt:?}"),
            RawValue::Object(obj) => write!(f, "{obj:?}"),
            RawValue::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<f64> for RawValue {
    fn from(x: f64) -> Self {
        RawValue::Float(x)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Str(Arc::from(s))
    }
}

impl From<DType> for RawValue {
    fn from(dt: DType) -> Self {
        RawValue::DType(dt)
    }
}

impl From<ObjRef> for RawValue {
    fn from(obj: ObjRef) -> Self {
        RawValue::Object(obj)
    }
}
