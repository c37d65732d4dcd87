//! Node instances

use crate::error::{BridgeError, BridgeResult};
use crate::registry::Registry;
use crate::schema::TypeSchema;
use crate::value::Value;
use tessera_runtime::{ObjRef, TypeTag};

/// A constructed instance of a registered type
///
/// A node is a thin view: it holds one counted reference to its heap object
/// plus the registry that knows the object's schema. Cloning a node shares
/// the object, so writes through one clone are seen by all of them.
#[derive(Clone)]
pub struct Node {
    obj: ObjRef,
    registry: Registry,
}

impl Node {
    pub(crate) fn from_parts(obj: ObjRef, registry: Registry) -> Self {
        Self { obj, registry }
    }

    pub(crate) fn into_obj(self) -> ObjRef {
        self.obj
    }

    /// Underlying heap object
    pub fn obj(&self) -> &ObjRef {
        &self.obj
    }

    /// Registry the node's type was declared in
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Schema of the node's concrete type
    pub fn schema(&self) -> &TypeSchema {
        self.registry.schema_of(self.obj.tag())
    }

    /// Name of the node's concrete type
    pub fn type_name(&self) -> &str {
        self.schema().type_name()
    }

    /// Tag of the node's concrete type
    pub fn tag(&self) -> TypeTag {
        self.obj.tag()
    }

    /// Read a field by name
    pub fn get(&self, name: &str) -> BridgeResult<Value> {
        let schema = self.schema();
        let index = schema
            .field_index(name)
            .ok_or_else(|| BridgeError::no_such_field(schema.type_name(), name))?;
        self.get_at(index)
    }

    /// Read a field by position in the full field list
    pub fn get_at(&self, index: usize) -> BridgeResult<Value> {
        let raw = self.registry.heap().get(&self.obj, index)?;
        Ok(Value::from_raw(raw, &self.registry))
    }

    /// Overwrite a field
    ///
    /// The value is checked like a constructor argument. The write is seen
    /// immediately by every holder of this instance.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> BridgeResult<()> {
        let schema = self.schema();
        let index = schema
            .field_index(name)
            .ok_or_else(|| BridgeError::no_such_field(schema.type_name(), name))?;
        let field = &schema.full_fields()[index];
        if field.is_frozen() {
            return Err(BridgeError::ImmutableField {
                type_name: schema.type_name().to_string(),
                field: name.to_string(),
            });
        }

        let value = self.registry.check_value(schema, field, value.into())?;
        self.registry.heap().set(&self.obj, index, value.into_raw())?;
        tracing::trace!(type_name = %schema.type_name(), field = name, "set field");
        Ok(())
    }

    /// All fields as `(name, value)` pairs in schema order
    pub fn fields(&self) -> BridgeResult<Vec<(&str, Value)>> {
        self.schema()
            .full_fields()
            .iter()
            .enumerate()
            .map(|(index, field)| Ok((field.name(), self.get_at(index)?)))
            .collect()
    }

    /// Check whether the node's type is `type_name` or one of its subtypes
    pub fn instance_of(&self, type_name: &str) -> bool {
        self.registry
            .get(type_name)
            .is_some_and(|target| self.schema().is_subtype_of(target.tag()))
    }

    /// Identity comparison
    #[inline]
    pub fn same_as(&self, other: &Node) -> bool {
        self.obj.ptr_eq(&other.obj)
    }

    /// Number of live references to the underlying object
    pub fn ref_count(&self) -> usize {
        self.obj.ref_count()
    }
}
