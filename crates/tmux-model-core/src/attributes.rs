//! Ordered attribute snapshot of one entity.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Field, Value};

/// Attribute mapping of an entity, keyed by its schema fields.
///
/// Two snapshots compare equal only if every field holds the same value.
/// This is "snapshot equality", distinct from identity equality which only
/// compares the stable tmux identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes<F: Field> {
    values: BTreeMap<F, Value>,
}

impl<F: Field> Attributes<F> {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Value of a field, if tmux reported it.
    pub fn get(&self, field: F) -> Option<&Value> {
        self.values.get(&field)
    }

    /// Text value of a field.
    pub fn get_str(&self, field: F) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Integer value of a field.
    pub fn get_int(&self, field: F) -> Option<i64> {
        self.get(field).and_then(Value::as_int)
    }

    /// Set a single field.
    pub fn insert(&mut self, field: F, value: impl Into<Value>) {
        self.values.insert(field, value.into());
    }

    /// Fields and values in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (F, &Value)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    /// Number of fields present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field is present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<F: Field> Default for Attributes<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Field> FromIterator<(F, Value)> for Attributes<F> {
    fn from_iter<I: IntoIterator<Item = (F, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
