//! Remote object representation
//!
//! A [`RemoteObject`] is the JSON-shaped form of a resource as the remote
//! management API understands it: a flat mapping from field name to JSON value.
//! Key order carries no meaning.

use crate::value::ShapeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the remote system's opaque identity token
pub const REF_FIELD: &str = "_ref";

/// Field holding user-defined extended attributes
pub const EXTATTRS_FIELD: &str = "extattrs";

/// JSON object exchanged with the remote API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteObject {
    fields: Map<String, Value>,
}

impl RemoteObject {
    /// Create an empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Insert a field, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    /// Merge another object's fields into this one. Fields of `fragment`
    /// replace fields with the same name.
    pub fn merge(&mut self, fragment: RemoteObject) {
        self.fields.extend(fragment.fields);
    }

    /// The `_ref` identity token, if present and a string
    pub fn reference(&self) -> Option<&str> {
        self.fields.get(REF_FIELD).and_then(Value::as_str)
    }

    /// Remove and return the `_ref` field
    pub fn take_reference(&mut self) -> Option<Value> {
        self.fields.remove(REF_FIELD)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for RemoteObject {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<RemoteObject> for Value {
    fn from(object: RemoteObject) -> Self {
        Value::Object(object.fields)
    }
}

impl TryFrom<Value> for RemoteObject {
    type Error = ShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ShapeError::new("<object>", "mapping", &other)),
        }
    }
}

impl IntoIterator for RemoteObject {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
