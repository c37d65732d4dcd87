//! Constructor arguments and their binding to a field list

use crate::error::{BridgeError, BridgeResult};
use crate::schema::TypeSchema;
use crate::value::Value;
use std::sync::Arc;

/// Positional and keyword arguments for a constructor call
///
/// ```
/// use tessera_core::Args;
///
/// let args = Args::new().arg(1i64).kw("b", 2i64);
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keyword: Vec<(Arc<str>, Value)>,
}

impl Args {
    /// No arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument
    pub fn kw(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }

    /// Positional arguments
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Keyword arguments in call order
    pub fn keyword(&self) -> &[(Arc<str>, Value)] {
        &self.keyword
    }

    /// Total number of arguments
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    /// Check for an empty call
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bind the arguments to the full field list of `schema`
    ///
    /// Positional arguments fill fields in order, keywords fill the rest by
    /// name. Every field must end up with exactly one value.
    pub(crate) fn bind(self, schema: &TypeSchema) -> BridgeResult<Vec<Value>> {
        let type_name = schema.type_name();
        let count = schema.field_count();
        if self.positional.len() > count {
            return Err(BridgeError::arity(
                type_name,
                format!(
                    "takes {} argument{} but {} were given",
                    count,
                    if count == 1 { "" } else { "s" },
                    self.positional.len()
                ),
            ));
        }

        let mut slots: Vec<Option<Value>> = self.positional.into_iter().map(Some).collect();
        slots.resize_with(count, || None);

        for (name, value) in self.keyword {
            let index = schema.field_index(&name).ok_or_else(|| {
                BridgeError::arity(type_name, format!("unexpected keyword argument '{name}'"))
            })?;
            if slots[index].is_some() {
                return Err(BridgeError::arity(
                    type_name,
                    format!("got multiple values for field '{name}'"),
                ));
            }
            slots[index] = Some(value);
        }

        let missing: Vec<&str> = slots
            .iter()
            .zip(schema.field_names())
            .filter(|(slot, _)| slot.is_none())
            .map(|(_, name)| name)
            .collect();
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(|name| format!("'{name}'")).collect();
            return Err(BridgeError::arity(
                type_name,
                format!("missing value for field{} {}", if missing.len() == 1 { "" } else { "s" }, names.join(", ")),
            ));
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

impl From<Vec<Value>> for Args {
    fn from(positional: Vec<Value>) -> Self {
        Self {
            positional,
            keyword: Vec::new(),
        }
    }
}

impl<V: Into<Value>> FromIterator<V> for Args {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::from(iter.into_iter().map(Into::into).collect::<Vec<_>>())
    }
}
