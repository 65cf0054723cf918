//! Structural view of JSON values
//!
//! The remote API speaks loosely-typed JSON. Every value the bridge handles is
//! a [`serde_json::Value`]; this module classifies values by structural kind and
//! provides checked accessors for the places where a particular shape is
//! required.

use serde_json::{Map, Value};
use thiserror::Error;

/// Structural kind of a JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Null, bool, number or string
    Scalar,
    /// JSON array
    Sequence,
    /// JSON object
    Mapping,
}

impl ValueKind {
    /// Classify a value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Array(_) => ValueKind::Sequence,
            Value::Object(_) => ValueKind::Mapping,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => ValueKind::Scalar,
        }
    }

    /// Sequences and mappings are compound
    pub fn is_compound(self) -> bool {
        !matches!(self, ValueKind::Scalar)
    }
}

/// A value did not have the shape the bridge requires at `path`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("shape mismatch at `{path}`: expected {expected}, found {found}")]
pub struct ShapeError {
    /// Dotted location of the offending value
    pub path: String,
    /// Expected shape
    pub expected: &'static str,
    /// Actual shape
    pub found: &'static str,
}

impl ShapeError {
    pub fn new(path: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        Self {
            path: path.into(),
            expected,
            found: type_name(found),
        }
    }
}

/// Short name of a value's JSON type, for diagnostics
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Checked accessors on JSON values
pub trait ValueExt {
    /// Structural kind of this value
    fn kind(&self) -> ValueKind;

    /// Borrow as a mapping, or report where the shape was wrong
    fn try_as_mapping(&self, path: &str) -> Result<&Map<String, Value>, ShapeError>;

    /// Borrow as a string, or report where the shape was wrong
    fn try_as_str(&self, path: &str) -> Result<&str, ShapeError>;
}

impl ValueExt for Value {
    fn kind(&self) -> ValueKind {
        ValueKind::of(self)
    }

    fn try_as_mapping(&self, path: &str) -> Result<&Map<String, Value>, ShapeError> {
        self.as_object()
            .ok_or_else(|| ShapeError::new(path, "mapping", self))
    }

    fn try_as_str(&self, path: &str) -> Result<&str, ShapeError> {
        self.as_str()
            .ok_or_else(|| ShapeError::new(path, "string", self))
    }
}

/// Abort the current operation on a schema/payload shape mismatch.
///
/// Shape mismatches mean the resource schema and the remote API disagree,
/// which is a bug in the bridge or its schema declarations, never a user
/// input error. They are therefore not reported through [`crate::Error`].
pub fn fatal(err: ShapeError) -> ! {
    tracing::error!("{}", err);
    panic!("{err}");
}
