//! Forwarding member name server group (`nsgroup:forwardingmember`)

use crate::resources::ResourceDefinition;
use crate::schema::{AttributeSchema, ResourceSchema, ValueType};
use crate::validation::check_leading_trailing_spaces;

pub const RESOURCE_NAME: &str = "infoblox_nsgroup_fwd";
pub const OBJECT_TYPE: &str = "nsgroup:forwardingmember";

pub fn definition() -> ResourceDefinition {
    ResourceDefinition {
        name: RESOURCE_NAME,
        object_type: OBJECT_TYPE,
        schema: schema(),
    }
}

fn schema() -> ResourceSchema {
    ResourceSchema::new()
        .with_attribute(
            "name",
            AttributeSchema::required(ValueType::String)
                .with_description("The name of the name server group"),
        )
        .with_attribute(
            "comment",
            AttributeSchema::optional(ValueType::String)
                .with_description("Comment field")
                .with_validator(check_leading_trailing_spaces),
        )
        .with_attribute("forwarding_servers", forwarding_member_server_list())
}

/// Grid members acting as forwarding servers, each with optional
/// per-member forwarders
fn forwarding_member_server_list() -> AttributeSchema {
    let external_server = ValueType::block([
        ("name", ValueType::String),
        ("address", ValueType::String),
    ]);

    let member = ValueType::block([
        ("name", ValueType::String),
        ("forwarders_only", ValueType::Bool),
        ("use_override_forwarders", ValueType::Bool),
        ("forward_to", ValueType::list_of(external_server)),
    ]);

    AttributeSchema::optional(ValueType::list_of(member))
        .with_description("The list of forwarding member servers")
}
