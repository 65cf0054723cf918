//! Host value → remote value conversion
//!
//! Dispatches on the descriptor's declared [`ValueType`]. Scalars and
//! ordinary sequences/mappings pass through unchanged once their shape has
//! been checked; extended attributes are wrapped.

use serde_json::Value;

use crate::reflect::extattrs;
use crate::schema::{AttributeDescriptor, ValueType};
use crate::value::{ShapeError, fatal};

/// Convert a descriptor's value into the JSON shape the remote API expects.
///
/// A descriptor without a value converts to `null`.
///
/// # Panics
///
/// If the value's shape contradicts the declared type. Host state is
/// produced against the same schema, so a mismatch is a bridge bug.
pub fn convert(descriptor: &AttributeDescriptor) -> Value {
    let Some(value) = descriptor.value.as_ref() else {
        return Value::Null;
    };

    if descriptor.is_extattrs() {
        return extattrs::wrap(value).unwrap_or_else(|err| fatal(err));
    }

    if !matches_type(value, &descriptor.value_type) {
        fatal(ShapeError::new(
            descriptor.name.clone(),
            expected_name(&descriptor.value_type),
            value,
        ));
    }

    value.clone()
}

fn matches_type(value: &Value, value_type: &ValueType) -> bool {
    match value_type {
        ValueType::String => value.is_string(),
        ValueType::Int => value.is_i64() || value.is_u64(),
        ValueType::Float => value.is_number(),
        ValueType::Bool => value.is_boolean(),
        ValueType::List(_) | ValueType::Set(_) => value.is_array(),
        ValueType::Map(_) | ValueType::Block(_) => value.is_object(),
    }
}

fn expected_name(value_type: &ValueType) -> &'static str {
    match value_type {
        ValueType::String => "string",
        ValueType::Int => "integer",
        ValueType::Float => "number",
        ValueType::Bool => "bool",
        ValueType::List(_) | ValueType::Set(_) => "sequence",
        ValueType::Map(_) | ValueType::Block(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Optionality;
    use serde_json::json;

    fn descriptor(name: &str, value_type: ValueType, value: Value) -> AttributeDescriptor {
        AttributeDescriptor {
            name: name.to_string(),
            value_type,
            optionality: Optionality::Optional,
            value: Some(value),
        }
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(
            convert(&descriptor("name", ValueType::String, json!("ns-group-1"))),
            json!("ns-group-1")
        );
        assert_eq!(convert(&descriptor("ttl", ValueType::Int, json!(3600))), json!(3600));
        assert_eq!(
            convert(&descriptor("disable", ValueType::Bool, json!(false))),
            json!(false)
        );
        assert_eq!(
            convert(&descriptor("ratio", ValueType::Float, json!(1))),
            json!(1)
        );
    }

    #[test]
    fn test_compound_values_pass_through() {
        let servers = json!([{"name": "gm.example.net", "forwarders_only": true}]);
        let list_type = ValueType::list_of(ValueType::block([
            ("name", ValueType::String),
            ("forwarders_only", ValueType::Bool),
        ]));
        assert_eq!(
            convert(&descriptor("forwarding_servers", list_type, servers.clone())),
            servers
        );
    }

    #[test]
    fn test_extattrs_are_wrapped() {
        let converted = convert(&descriptor(
            "extattrs",
            ValueType::map_of(ValueType::String),
            json!({"Site": "us-east-1"}),
        ));
        assert_eq!(converted, json!({"Site": {"value": "us-east-1"}}));
    }

    #[test]
    fn test_missing_value_is_null() {
        let mut d = descriptor("comment", ValueType::String, json!("x"));
        d.value = None;
        assert_eq!(convert(&d), Value::Null);
    }

    #[test]
    #[should_panic(expected = "shape mismatch at `name`")]
    fn test_type_mismatch_is_fatal() {
        convert(&descriptor("name", ValueType::String, json!(12)));
    }

    #[test]
    #[should_panic(expected = "shape mismatch at `extattrs.Site`")]
    fn test_malformed_extattrs_is_fatal() {
        convert(&descriptor(
            "extattrs",
            ValueType::map_of(ValueType::String),
            json!({"Site": ["us-east-1"]}),
        ));
    }
}
