//! Registered type schemas
//!
//! A schema is built once, when its type is registered, and never changes
//! afterwards. Inherited fields come first (root to leaf), own fields last,
//! so a field keeps the same index in every subtype.

use crate::field::Field;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tessera_runtime::TypeTag;

/// Shape of a registered node type
#[derive(Debug, Clone)]
pub struct TypeSchema {
    pub(crate) type_name: Arc<str>,
    pub(crate) tag: TypeTag,
    pub(crate) base: Option<TypeTag>,
    /// Tags from the root type down to this one
    pub(crate) ancestry: Vec<TypeTag>,
    /// Full field list
    pub(crate) fields: Vec<Field>,
    /// Index of the first own field
    pub(crate) own_start: usize,
    pub(crate) field_indices: FxHashMap<Arc<str>, usize>,
}

impl TypeSchema {
    /// Registered type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Tag assigned by the heap
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Tag of the direct base type
    pub fn base(&self) -> Option<TypeTag> {
        self.base
    }

    /// Tags from the root type down to this one (inclusive)
    pub fn ancestry(&self) -> &[TypeTag] {
        &self.ancestry
    }

    /// Number of base types above this one
    pub fn depth(&self) -> usize {
        self.ancestry.len() - 1
    }

    /// Inherited fields followed by own fields
    pub fn full_fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fields declared by this type itself
    pub fn own_fields(&self) -> &[Field] {
        &self.fields[self.own_start..]
    }

    /// Fields inherited from the base chain
    pub fn inherited_fields(&self) -> &[Field] {
        &self.fields[..self.own_start]
    }

    /// Number of fields, inherited included
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Position of a field in the full list
    #[inline]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.field_indices.get(name).copied()
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.field_index(name).map(|index| &self.fields[index])
    }

    /// Field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|field| field.name())
    }

    /// Check whether this type is `tag` or derives from it
    #[inline]
    pub fn is_subtype_of(&self, tag: TypeTag) -> bool {
        self.ancestry.contains(&tag)
    }
}
