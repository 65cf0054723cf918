//! Resource schemas and attribute descriptors
//!
//! A [`ResourceSchema`] is the static declaration of a resource type's
//! attributes. [`ResourceSchema::descriptors`] extracts the ordered list of
//! [`AttributeDescriptor`]s the serializer walks for every CRUD call.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::object::EXTATTRS_FIELD;
use crate::traits::ResourceData;

/// Per-attribute validation hook, called with the attribute's value and name
pub type Validator = fn(&Value, &str) -> Result<()>;

/// Declared value representation of an attribute
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    String,
    Int,
    Float,
    Bool,
    /// Ordered sequence of elements
    List(Box<ValueType>),
    /// Unordered sequence of unique elements
    Set(Box<ValueType>),
    /// Mapping from string keys to elements
    Map(Box<ValueType>),
    /// Nested object with named fields
    Block(Vec<(String, ValueType)>),
}

impl ValueType {
    pub fn list_of(element: ValueType) -> Self {
        ValueType::List(Box::new(element))
    }

    pub fn set_of(element: ValueType) -> Self {
        ValueType::Set(Box::new(element))
    }

    pub fn map_of(element: ValueType) -> Self {
        ValueType::Map(Box::new(element))
    }

    pub fn block<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, ValueType)>,
        K: Into<String>,
    {
        ValueType::Block(
            fields
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        )
    }
}

/// Who provides an attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optionality {
    /// Must be set by the user
    Required,
    /// May be set by the user
    Optional,
    /// Only ever set from the remote side
    Computed,
    /// May be set by the user, otherwise filled from the remote side
    OptionalComputed,
}

/// Declaration of a single attribute
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub value_type: ValueType,
    pub optionality: Optionality,
    pub description: Option<String>,
    pub validator: Option<Validator>,
}

impl AttributeSchema {
    fn new(value_type: ValueType, optionality: Optionality) -> Self {
        Self {
            value_type,
            optionality,
            description: None,
            validator: None,
        }
    }

    pub fn required(value_type: ValueType) -> Self {
        Self::new(value_type, Optionality::Required)
    }

    pub fn optional(value_type: ValueType) -> Self {
        Self::new(value_type, Optionality::Optional)
    }

    pub fn computed(value_type: ValueType) -> Self {
        Self::new(value_type, Optionality::Computed)
    }

    pub fn optional_computed(value_type: ValueType) -> Self {
        Self::new(value_type, Optionality::OptionalComputed)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// Ordered attribute declarations for one resource type
///
/// Declaration order is the order the serializer visits attributes in.
#[derive(Debug, Clone, Default)]
pub struct ResourceSchema {
    attributes: Vec<(String, AttributeSchema)>,
}

impl ResourceSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an attribute. Redeclaring a name replaces the earlier
    /// declaration in place.
    pub fn with_attribute(mut self, name: impl Into<String>, schema: AttributeSchema) -> Self {
        let name = name.into();
        match self.attributes.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = schema,
            None => self.attributes.push((name, schema)),
        }
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, schema)| schema)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeSchema)> {
        self.attributes
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attribute names in schema order (the field list for remote reads)
    pub fn keys(&self) -> Vec<String> {
        self.attributes.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Extract a fresh descriptor per declared attribute, in schema order.
    ///
    /// Descriptors carry no value; the serializer fills them from host state.
    pub fn descriptors(&self) -> Vec<AttributeDescriptor> {
        self.attributes
            .iter()
            .map(|(name, schema)| AttributeDescriptor {
                name: name.clone(),
                value_type: schema.value_type.clone(),
                optionality: schema.optionality,
                value: None,
            })
            .collect()
    }

    /// Check required attributes are set and run per-attribute validators
    pub fn validate(&self, data: &dyn ResourceData) -> Result<()> {
        for (name, schema) in &self.attributes {
            let value = data.get_ok(name);

            if schema.optionality == Optionality::Required && value.is_none() {
                return Err(Error::invalid_input(format!(
                    "attribute `{}` is required",
                    name
                )));
            }

            if let (Some(validator), Some(value)) = (schema.validator, value.as_ref()) {
                validator(value, name)?;
            }
        }
        Ok(())
    }
}

/// One attribute of one CRUD call
///
/// Built fresh from the schema for each call and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    pub name: String,
    pub value_type: ValueType,
    pub optionality: Optionality,
    /// Host-side value, filled during serialization
    pub value: Option<Value>,
}

impl AttributeDescriptor {
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Whether this is the extended-attributes field
    pub fn is_extattrs(&self) -> bool {
        self.name == EXTATTRS_FIELD
    }
}
