//! Extended attributes wrap/unwrap
//!
//! Host side, extended attributes are a flat mapping:
//!
//! ```json
//! { "Site": "us-east-1", "Cloud Region": "us-east-1" }
//! ```
//!
//! Remote side, every value sits under a one-key wrapper:
//!
//! ```json
//! { "Site": { "value": "us-east-1" }, "Cloud Region": { "value": "us-east-1" } }
//! ```

use serde_json::{Map, Value};

use crate::object::EXTATTRS_FIELD;
use crate::value::{ShapeError, ValueExt};

/// Key of the wrapper mapping around each extended attribute value
pub const WRAPPER_KEY: &str = "value";

/// Host shape → remote shape
pub fn wrap(flat: &Value) -> Result<Value, ShapeError> {
    let entries = flat.try_as_mapping(EXTATTRS_FIELD)?;

    let mut wrapped = Map::with_capacity(entries.len());
    for (name, value) in entries {
        let text = value.try_as_str(&format!("{}.{}", EXTATTRS_FIELD, name))?;

        let mut wrapper = Map::with_capacity(1);
        wrapper.insert(WRAPPER_KEY.to_string(), Value::String(text.to_string()));
        wrapped.insert(name.clone(), Value::Object(wrapper));
    }

    Ok(Value::Object(wrapped))
}

/// Remote shape → host shape
pub fn unwrap(remote: &Value) -> Result<Value, ShapeError> {
    let entries = remote.try_as_mapping(EXTATTRS_FIELD)?;

    let mut flat = Map::with_capacity(entries.len());
    for (name, wrapper) in entries {
        let path = format!("{}.{}", EXTATTRS_FIELD, name);
        let wrapper = wrapper.try_as_mapping(&path)?;

        let value_path = format!("{}.{}", path, WRAPPER_KEY);
        let text = match wrapper.get(WRAPPER_KEY) {
            Some(value) => value.try_as_str(&value_path)?,
            None => {
                return Err(ShapeError {
                    path: value_path,
                    expected: "string",
                    found: "nothing",
                });
            }
        };

        flat.insert(name.clone(), Value::String(text.to_string()));
    }

    Ok(Value::Object(flat))
}
