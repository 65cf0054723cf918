//! IPv4 network (`network`)

use crate::object::EXTATTRS_FIELD;
use crate::resources::ResourceDefinition;
use crate::schema::{AttributeSchema, ResourceSchema, ValueType};
use crate::validation::check_leading_trailing_spaces;

pub const RESOURCE_NAME: &str = "infoblox_network";
pub const OBJECT_TYPE: &str = "network";

pub fn definition() -> ResourceDefinition {
    ResourceDefinition {
        name: RESOURCE_NAME,
        object_type: OBJECT_TYPE,
        schema: ResourceSchema::new()
            .with_attribute(
                "network",
                AttributeSchema::required(ValueType::String)
                    .with_description("The network address in CIDR notation"),
            )
            .with_attribute(
                "network_view",
                AttributeSchema::optional_computed(ValueType::String)
                    .with_description("The network view the network belongs to"),
            )
            .with_attribute(
                "comment",
                AttributeSchema::optional(ValueType::String)
                    .with_description("Comment field")
                    .with_validator(check_leading_trailing_spaces),
            )
            .with_attribute(
                EXTATTRS_FIELD,
                AttributeSchema::optional(ValueType::map_of(ValueType::String))
                    .with_description("Extensible attributes, by attribute name"),
            ),
    }
}
