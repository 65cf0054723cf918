//! Built-in resource declarations
//!
//! Each resource pairs a host-side type name with the remote object type it
//! maps to and the attribute schema the reflection engine walks.

pub mod network;
pub mod nsgroup_forward;

use crate::registry::Registry;
use crate::schema::ResourceSchema;

/// A resource type the bridge can manage
#[derive(Debug, Clone)]
pub struct ResourceDefinition {
    /// Host-side resource type name (e.g. "infoblox_nsgroup_fwd")
    pub name: &'static str,
    /// Remote object type (e.g. "nsgroup:forwardingmember")
    pub object_type: &'static str,
    /// Attribute declarations
    pub schema: ResourceSchema,
}

/// All built-in resource definitions
pub fn builtin() -> Vec<ResourceDefinition> {
    vec![nsgroup_forward::definition(), network::definition()]
}

/// Register the built-in resources with a registry
pub fn register_builtin(registry: &Registry) {
    for definition in builtin() {
        registry.register_resource(definition);
    }
}
