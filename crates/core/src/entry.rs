//! The (Key, Value) pair flowing through iteration

use crate::error::{Error, Result};
use crate::key::Key;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A single key/value pair.
///
/// Entries are immutable: they are produced by an adapter scan or by the
/// fallback executor and never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    key: Key,
    value: Value,
}

impl Entry {
    /// Pair a key with a value.
    pub fn new(key: Key, value: Value) -> Self {
        Self { key, value }
    }

    /// The key naming this entry.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The payload stored against the key.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Split the entry back into its parts.
    pub fn into_parts(self) -> (Key, Value) {
        (self.key, self.value)
    }

    /// Resolve a named field of the payload.
    ///
    /// This is the accessor field filters and field orders evaluate
    /// through. The payload must be a [`Value::Object`] containing the
    /// field; anything else is an [`Error::FieldAccess`], which the engine
    /// treats as terminal for the query rather than skipping the entry.
    pub fn field(&self, name: &str) -> Result<&Value> {
        match &self.value {
            Value::Object(fields) => fields
                .get(name)
                .ok_or_else(|| Error::field_access(name, "field is absent")),
            other => Err(Error::field_access(
                name,
                format!("value is {}, not Object", other.type_name()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn object(fields: &[(&str, Value)]) -> Value {
        Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn field_lookup_on_object() {
        let key = Key::parse("/users/alice").unwrap();
        let entry = Entry::new(key, object(&[("age", Value::Int(30))]));

        assert_eq!(entry.field("age").unwrap(), &Value::Int(30));
    }

    #[test]
    fn absent_field_is_an_error() {
        let key = Key::parse("/users/alice").unwrap();
        let entry = Entry::new(key, object(&[("age", Value::Int(30))]));

        let err = entry.field("name").unwrap_err();
        assert!(err.is_field_access());
    }

    #[test]
    fn non_object_value_is_an_error() {
        let key = Key::parse("/blob").unwrap();
        let entry = Entry::new(key, Value::Bytes(vec![1, 2, 3]));

        let err = entry.field("age").unwrap_err();
        assert!(err.is_field_access());
    }

    #[test]
    fn into_parts_round_trip() {
        let key = Key::parse("/k").unwrap();
        let entry = Entry::new(key.clone(), Value::Int(7));
        let (k, v) = entry.into_parts();
        assert_eq!(k, key);
        assert_eq!(v, Value::Int(7));
    }
}
