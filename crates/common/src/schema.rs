//! JSON Schema document model
//!
//! Field order in these structs is the key order of the emitted JSON, and
//! empty values are skipped so that generated files only carry what a message
//! actually declares.

use crate::{GeneratorError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `$schema` value written on every top-level document
pub const SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

/// JSON Schema primitive types emitted by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
}

/// One entry of an `enum` keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Name(String),
    Number(i32),
}

/// Schema for a single field, or for the items of a repeated field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub json_type: Option<JsonType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<EnumValue>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, PropertyNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertyNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// The enclosing document must list this field as required
    #[serde(skip)]
    pub is_required: bool,

    /// The node (or its items) points at a message definition
    #[serde(skip)]
    pub is_ref: bool,
}

impl PropertyNode {
    /// Node with a concrete type and nothing else
    pub fn typed(json_type: JsonType) -> Self {
        Self {
            json_type: Some(json_type),
            ..Default::default()
        }
    }

    /// Node with a concrete type and a `format`
    pub fn formatted(json_type: JsonType, format: &str) -> Self {
        Self {
            json_type: Some(json_type),
            format: Some(format.to_string()),
            ..Default::default()
        }
    }

    /// Terminal `$ref` node
    pub fn reference(target: impl Into<String>) -> Self {
        Self {
            reference: Some(target.into()),
            ..Default::default()
        }
    }

    /// `array` node wrapping `items`
    ///
    /// The array inherits `is_ref` from its items so that repeated message
    /// fields still get their definitions inlined.
    pub fn array(items: PropertyNode) -> Self {
        Self {
            json_type: Some(JsonType::Array),
            is_ref: items.is_ref,
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }
}

/// A JSON Schema document
///
/// Top-level documents are produced once per generated message. The same type
/// is used for the entries of `definitions`, which leave `$id`, `$schema` and
/// `title` unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema_dialect: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub json_type: Option<JsonType>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, PropertyNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, SchemaDocument>,
}

impl SchemaDocument {
    /// Create the root document for a message named `message_name`
    pub fn new(message_name: &str, description: Option<String>) -> Self {
        Self {
            id: Some(format!("{}.json", message_name)),
            schema_dialect: Some(SCHEMA_DIALECT.to_string()),
            title: Some(message_name.to_string()),
            description,
            json_type: Some(JsonType::Object),
            ..Default::default()
        }
    }

    /// Create an entry for a `definitions` table
    pub fn definition(description: Option<String>) -> Self {
        Self {
            description,
            json_type: Some(JsonType::Object),
            ..Default::default()
        }
    }

    /// Append `name` to `required` unless it is already listed
    pub fn add_required(&mut self, name: &str) {
        if !self.required.iter().any(|existing| existing == name) {
            self.required.push(name.to_string());
        }
    }

    /// Serialize as JSON indented with four spaces
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| {
            GeneratorError::Generation(format!("Serialized schema is not valid UTF-8: {}", e))
        })
    }
}
