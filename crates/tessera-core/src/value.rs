//! Field values as seen through the bridge

use crate::node::Node;
use crate::registry::Registry;
use std::sync::Arc;
use tessera_dtype::DType;
use tessera_runtime::RawValue;

/// A field value
///
/// Mirrors [`RawValue`] with object handles wrapped into [`Node`]s so they
/// carry their schema along.
#[derive(Clone)]
pub enum Value {
    /// No value
    None,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    Str(Arc<str>),
    /// Canonical dtype
    DType(DType),
    /// Node instance
    Node(Node),
    /// Ordered sequence
    List(Vec<Value>),
}

impl Value {
    /// Short name of the value's shape, for diagnostics
    pub fn kind_name(&self) -> String {
        match self {
            Value::None => "none".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "str".to_string(),
            Value::DType(_) => "dtype".to_string(),
            Value::Node(node) => node.type_name().to_string(),
            Value::List(_) => "list".to_string(),
        }
    }

    /// Check for `None`
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Integer payload
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float payload
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// DType payload
    pub fn as_dtype(&self) -> Option<DType> {
        match self {
            Value::DType(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Node payload
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Take the node out of the value
    pub fn into_node(self) -> Option<Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// List payload
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub(crate) fn into_raw(self) -> RawValue {
        match self {
            Value::None => RawValue::None,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Int(i) => RawValue::Int(i),
            Value::Float(x) => RawValue::Float(x),
            Value::Str(s) => RawValue::Str(s),
            Value::DType(dt) => RawValue::DType(dt),
            Value::Node(node) => RawValue::Object(node.into_obj()),
            Value::List(items) => RawValue::List(items.into_iter().map(Value::into_raw).collect()),
        }
    }

    pub(crate) fn from_raw(raw: RawValue, registry: &Registry) -> Value {
        match raw {
            RawValue::None => Value::None,
            RawValue::Bool(b) => Value::Bool(b),
            RawValue::Int(i) => Value::Int(i),
            RawValue::Float(x) => Value::Float(x),
            RawValue::Str(s) => Value::Str(s),
            RawValue::DType(dt) => Value::DType(dt),
            RawValue::Object(obj) => Value::Node(Node::from_parts(obj, registry.clone())),
            RawValue::List(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| Value::from_raw(item, registry))
                    .collect(),
            ),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::None
    }
}

// Nodes compare structurally; floats by value, so NaN fields are unequal
// unless both sides are the same instance
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::DType(a), Value::DType(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<DType> for Value {
    fn from(dt: DType) -> Self {
        Value::DType(dt)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        Value::Node(node.clone())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<Node>> for Value {
    fn from(nodes: Vec<Node>) -> Self {
        Value::List(nodes.into_iter().map(Value::Node).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}
