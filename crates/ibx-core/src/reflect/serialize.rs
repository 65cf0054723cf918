//! Host state → remote object
//!
//! Two modes:
//! - full (`only_changed = false`): every attribute the host has a value for
//! - diff (`only_changed = true`): only attributes the host reports changed
//!
//! Unset attributes are never emitted, so "unset" stays distinguishable
//! from "empty".

use tracing::debug;

use crate::object::RemoteObject;
use crate::reflect::convert;
use crate::schema::AttributeDescriptor;
use crate::traits::ResourceData;

/// Serialize a single attribute into a one-field fragment.
///
/// Returns `None` when the attribute is skipped: unchanged in diff mode, or
/// unset on the host.
pub fn serialize_attribute(
    descriptor: AttributeDescriptor,
    data: &dyn ResourceData,
    only_changed: bool,
) -> Option<RemoteObject> {
    if only_changed && !data.has_change(&descriptor.name) {
        return None;
    }

    let value = data.get_ok(&descriptor.name)?;
    let descriptor = descriptor.with_value(value);
    let converted = convert(&descriptor);

    debug!("Serialized field {}: {}", descriptor.name, converted);
    Some(RemoteObject::new().with_field(descriptor.name, converted))
}

/// Assemble the object to send for `object_type` from host state
pub fn serialize(
    object_type: &str,
    descriptors: Vec<AttributeDescriptor>,
    data: &dyn ResourceData,
    only_changed: bool,
) -> RemoteObject {
    let mut object = RemoteObject::new();

    for descriptor in descriptors {
        if let Some(fragment) = serialize_attribute(descriptor, data, only_changed) {
            object.merge(fragment);
        }
    }

    debug!(
        "{} object to send ({} field(s), only_changed={}): {}",
        object_type,
        object.len(),
        only_changed,
        serde_json::Value::from(object.clone())
    );

    object
}
