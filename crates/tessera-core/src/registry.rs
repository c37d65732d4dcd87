//! Type registry
//!
//! Types are declared on a [`RegistryBuilder`] during initialization and the
//! builder is then frozen into a [`Registry`]. The frozen registry is an
//! immutable table behind an `Arc`; lookups take no locks and clones are
//! cheap, so it can be shared freely across threads.
//!
//! ```
//! use tessera_core::{Args, FieldType, RegistryBuilder};
//!
//! let mut builder = RegistryBuilder::new();
//! builder.declare("Expr").finish().unwrap();
//! builder.declare("Var").extends("Expr").field("name", FieldType::Str).finish().unwrap();
//! let registry = builder.build();
//!
//! let x = registry.construct("Var", Args::new().arg("x")).unwrap();
//! assert_eq!(x.to_string(), "Var(name='x')");
//! ```

use crate::args::Args;
use crate::error::{BridgeError, BridgeResult};
use crate::field::{Field, FieldDecl, FieldType};
use crate::node::Node;
use crate::schema::TypeSchema;
use crate::value::Value;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use tessera_dtype::normalize;
use tessera_runtime::{Heap, HeapConfig, TypeTag};

/// Mutable registry used while types are being declared
pub struct RegistryBuilder {
    heap: Heap,
    /// Indexed by tag
    schemas: Vec<TypeSchema>,
    by_name: FxHashMap<Arc<str>, TypeTag>,
}

impl RegistryBuilder {
    /// Builder over an unlimited heap
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    /// Builder over a heap with the given configuration
    pub fn with_config(config: HeapConfig) -> Self {
        Self {
            heap: Heap::with_config(config),
            schemas: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Start a fluent type declaration
    pub fn declare(&mut self, type_name: impl Into<Arc<str>>) -> TypeDecl<'_> {
        TypeDecl {
            builder: self,
            type_name: type_name.into(),
            base: None,
            fields: Vec::new(),
        }
    }

    /// Register a type
    ///
    /// The full field list is the base's full field list followed by
    /// `fields`. Fails without side effects if the name is taken, the base
    /// is unknown, a field name repeats, or a node field references an
    /// unregistered type (other than `type_name` itself).
    pub fn register<I, F>(
        &mut self,
        type_name: &str,
        base: Option<&str>,
        fields: I,
    ) -> BridgeResult<&TypeSchema>
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldDecl>,
    {
        if self.by_name.contains_key(type_name) {
            return Err(BridgeError::DuplicateType {
                type_name: type_name.to_string(),
            });
        }

        let base_schema = match base {
            Some(base) => Some(self.get(base).ok_or_else(|| BridgeError::UnknownBase {
                type_name: type_name.to_string(),
                base: base.to_string(),
            })?),
            None => None,
        };

        let next_tag = TypeTag::from_raw(self.schemas.len() as u32);
        let (mut all_fields, mut field_indices, mut ancestry) = match base_schema {
            Some(base) => (
                base.fields.clone(),
                base.field_indices.clone(),
                base.ancestry.clone(),
            ),
            None => (Vec::new(), FxHashMap::default(), Vec::new()),
        };
        let own_start = all_fields.len();

        for decl in fields {
            let decl = decl.into();
            let target = match decl.ty.referenced_type() {
                Some(referenced) if referenced == type_name => Some(next_tag),
                Some(referenced) => Some(self.by_name.get(referenced).copied().ok_or_else(
                    || BridgeError::UnknownFieldType {
                        type_name: type_name.to_string(),
                        field: decl.name.to_string(),
                        referenced: referenced.to_string(),
                    },
                )?),
                None => None,
            };
            if field_indices.contains_key(&decl.name) {
                return Err(BridgeError::DuplicateField {
                    type_name: type_name.to_string(),
                    field: decl.name.to_string(),
                });
            }
            field_indices.insert(decl.name.clone(), all_fields.len());
            all_fields.push(Field {
                name: decl.name,
                ty: decl.ty,
                target,
                frozen: decl.frozen,
            });
        }

        let tag = self.heap.assign_type_tag(type_name);
        debug_assert_eq!(tag, next_tag);
        ancestry.push(tag);

        let type_name: Arc<str> = Arc::from(type_name);
        let schema = TypeSchema {
            type_name: type_name.clone(),
            tag,
            base: base_schema.map(|base| base.tag),
            ancestry,
            fields: all_fields,
            own_start,
            field_indices,
        };
        tracing::debug!(
            type_name = %type_name,
            base = base.unwrap_or("-"),
            %tag,
            fields = schema.field_count(),
            "registered type"
        );

        self.by_name.insert(type_name, tag);
        self.schemas.push(schema);
        Ok(&self.schemas[tag.index()])
    }

    /// Look up a registered type
    pub fn get(&self, type_name: &str) -> Option<&TypeSchema> {
        self.by_name
            .get(type_name)
            .map(|tag| &self.schemas[tag.index()])
    }

    /// Check whether a type is registered
    pub fn contains(&self, type_name: &str) -> bool {
        self.by_name.contains_key(type_name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if nothing is registered yet
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Freeze the builder
    pub fn build(self) -> Registry {
        tracing::debug!(types = self.schemas.len(), heap = %self.heap.id(), "froze type registry");
        Registry {
            inner: Arc::new(RegistryInner {
                heap: self.heap,
                schemas: self.schemas,
                by_name: self.by_name,
            }),
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("types", &self.schemas.len())
            .field("heap", &self.heap)
            .finish()
    }
}

/// Fluent type declaration, finished with [`TypeDecl::finish`]
#[must_use = "a declaration does nothing until finished"]
pub struct TypeDecl<'a> {
    builder: &'a mut RegistryBuilder,
    type_name: Arc<str>,
    base: Option<Arc<str>>,
    fields: Vec<FieldDecl>,
}

impl<'a> TypeDecl<'a> {
    /// Set the base type
    pub fn extends(mut self, base: impl Into<Arc<str>>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Add a mutable field
    pub fn field(mut self, name: impl Into<Arc<str>>, ty: FieldType) -> Self {
        self.fields.push(FieldDecl::new(name, ty));
        self
    }

    /// Add a field that cannot be written after construction
    pub fn frozen_field(mut self, name: impl Into<Arc<str>>, ty: FieldType) -> Self {
        self.fields.push(FieldDecl::new(name, ty).frozen());
        self
    }

    /// Register the declared type
    pub fn finish(self) -> BridgeResult<&'a TypeSchema> {
        let TypeDecl {
            builder,
            type_name,
            base,
            fields,
        } = self;
        builder.register(&type_name, base.as_deref(), fields)
    }
}

struct RegistryInner {
    heap: Heap,
    schemas: Vec<TypeSchema>,
    by_name: FxHashMap<Arc<str>, TypeTag>,
}

/// Frozen type registry and the heap its nodes live on
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    /// Start declaring types
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up a type by name
    pub fn get(&self, type_name: &str) -> Option<&TypeSchema> {
        self.inner
            .by_name
            .get(type_name)
            .map(|tag| &self.inner.schemas[tag.index()])
    }

    /// Look up a type by name, failing with `UnknownType`
    pub fn schema(&self, type_name: &str) -> BridgeResult<&TypeSchema> {
        self.get(type_name).ok_or_else(|| BridgeError::UnknownType {
            type_name: type_name.to_string(),
        })
    }

    /// Look up a type by tag
    pub fn get_by_tag(&self, tag: TypeTag) -> Option<&TypeSchema> {
        self.inner.schemas.get(tag.index())
    }

    /// Schema of the direct base type
    pub fn base_of(&self, schema: &TypeSchema) -> Option<&TypeSchema> {
        schema.base().and_then(|tag| self.get_by_tag(tag))
    }

    /// Check whether a type is registered
    pub fn contains(&self, type_name: &str) -> bool {
        self.inner.by_name.contains_key(type_name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.inner.schemas.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.inner.schemas.is_empty()
    }

    /// Schemas in registration order
    pub fn iter(&self) -> impl Iterator<Item = &TypeSchema> + '_ {
        self.inner.schemas.iter()
    }

    /// Heap backing every node of this registry
    pub fn heap(&self) -> &Heap {
        &self.inner.heap
    }

    /// Check whether two handles share the same frozen table
    pub fn ptr_eq(&self, other: &Registry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Construct an instance of `type_name`
    ///
    /// Arguments are bound to the full field list, then every value is
    /// checked against its field type. Nothing is allocated unless all
    /// fields bind and validate.
    pub fn construct(&self, type_name: &str, args: Args) -> BridgeResult<Node> {
        let schema = self.schema(type_name)?;
        let bound = args.bind(schema)?;
        let fields = schema
            .full_fields()
            .iter()
            .zip(bound)
            .map(|(field, value)| self.check_value(schema, field, value).map(Value::into_raw))
            .collect::<BridgeResult<Vec<_>>>()?;

        let obj = self.inner.heap.alloc(schema.tag(), fields)?;
        tracing::trace!(type_name = %schema.type_name(), addr = obj.addr(), "constructed node");
        Ok(Node::from_parts(obj, self.clone()))
    }

    /// Construct from positional values only
    pub fn new_node<I, V>(&self, type_name: &str, values: I) -> BridgeResult<Node>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.construct(type_name, values.into_iter().collect())
    }

    pub(crate) fn schema_of(&self, tag: TypeTag) -> &TypeSchema {
        // Only nodes built by this registry reach here, so the tag is ours
        &self.inner.schemas[tag.index()]
    }

    /// Validate `value` against `field`, normalizing dtype spellings
    pub(crate) fn check_value(
        &self,
        schema: &TypeSchema,
        field: &Field,
        value: Value,
    ) -> BridgeResult<Value> {
        let mismatch = |found: &Value| BridgeError::TypeMismatch {
            type_name: schema.type_name().to_string(),
            field: field.name().to_string(),
            expected: field.ty().to_string(),
            found: found.kind_name(),
        };

        match (field.ty(), value) {
            (FieldType::Int, value @ Value::Int(_))
            | (FieldType::Float, value @ Value::Float(_))
            | (FieldType::Str, value @ Value::Str(_))
            | (FieldType::Bool, value @ Value::Bool(_))
            | (FieldType::DType, value @ Value::DType(_)) => Ok(value),
            (FieldType::DType, Value::Str(spelling)) => Ok(Value::DType(normalize(&*spelling)?)),
            (FieldType::Any, value) => {
                self.check_owned(&value)?;
                Ok(value)
            }
            (FieldType::Node(_), Value::Node(node)) => {
                self.check_owned_node(&node)?;
                if self.node_fits(field, &node) {
                    Ok(Value::Node(node))
                } else {
                    Err(mismatch(&Value::Node(node)))
                }
            }
            (FieldType::List(_), Value::List(items)) => {
                for item in &items {
                    match item {
                        Value::Node(node) => {
                            self.check_owned_node(node)?;
                            if !self.node_fits(field, node) {
                                return Err(mismatch(item));
                            }
                        }
                        other => return Err(mismatch(other)),
                    }
                }
                Ok(Value::List(items))
            }
            (_, value) => Err(mismatch(&value)),
        }
    }

    fn node_fits(&self, field: &Field, node: &Node) -> bool {
        match field.target() {
            Some(target) => node.schema().is_subtype_of(target),
            None => false,
        }
    }

    fn check_owned_node(&self, node: &Node) -> BridgeResult<()> {
        if node.registry().ptr_eq(self) {
            Ok(())
        } else {
            Err(tessera_runtime::RuntimeError::ForeignHeap {
                expected: self.heap().id(),
                found: node.obj().heap_id(),
            }
            .into())
        }
    }

    fn check_owned(&self, value: &Value) -> BridgeResult<()> {
        match value {
            Value::Node(node) => self.check_owned_node(node),
            Value::List(items) => items.iter().try_for_each(|item| self.check_owned(item)),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.len())
            .field("heap", self.heap())
            .finish()
    }
}
