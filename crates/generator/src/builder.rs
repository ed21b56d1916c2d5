//! Schema derivation
//!
//! [`SchemaBuilder`] turns one message descriptor into a [`SchemaDocument`].
//! Fields that reference other messages become `$ref`s. When
//! `repeated_defs` is on, the referenced messages are derived as well and
//! stored in the root document's `definitions`, flattened to a single level.

use crate::type_mapper::{MappedType, TypeMapper, WellKnownType};
use prost_reflect::{EnumDescriptor, FieldDescriptor, Kind, MessageDescriptor};
use protoc_gen_jsonschema_common::{
    EnumType, EnumValue, GeneratorConfig, JsonType, PropertyNode, SchemaDocument,
};
use protoc_gen_jsonschema_parser::{
    field_description, message_description, AnnotationResolver, FieldAnnotations,
    MessageAnnotations,
};
use std::collections::{HashMap, HashSet};

/// Derives JSON Schema documents from message descriptors
pub struct SchemaBuilder<'a, R: ?Sized> {
    config: GeneratorConfig,
    resolver: &'a R,
    /// Full names of messages whose definitions are being derived
    in_progress: HashSet<String>,
    /// Definition key to the full name of the message inlined under it
    inlined: HashMap<String, String>,
}

impl<'a, R: AnnotationResolver + ?Sized> SchemaBuilder<'a, R> {
    pub fn new(config: GeneratorConfig, resolver: &'a R) -> Self {
        Self {
            config,
            resolver,
            in_progress: HashSet::new(),
            inlined: HashMap::new(),
        }
    }

    /// Build the root document for `message`
    ///
    /// Returns `None` when the message is annotated with `ignore`.
    pub fn build(&mut self, message: &MessageDescriptor) -> Option<SchemaDocument> {
        let annotations = self.resolver.message_annotations(message);
        if annotations.as_ref().is_some_and(|a| a.ignore) {
            tracing::debug!(message = message.full_name(), "message ignored by annotation");
            return None;
        }

        self.inlined.clear();
        let document = SchemaDocument::new(message.name(), message_description(message));
        Some(self.derive_document(message, annotations.as_ref(), document))
    }

    /// Fill `document` with the fields of `message`
    pub fn derive_document(
        &mut self,
        message: &MessageDescriptor,
        annotations: Option<&MessageAnnotations>,
        mut document: SchemaDocument,
    ) -> SchemaDocument {
        if let Some(id) = annotations.and_then(MessageAnnotations::id) {
            document.id = Some(id.to_string());
        }

        for field in message.fields() {
            let field_annotations = self.resolver.field_annotations(&field);
            let Some(property) = self.derive_property(&field, field_annotations.as_ref(), true)
            else {
                tracing::debug!(field = field.full_name(), "field omitted from schema");
                continue;
            };

            let json_name = field.json_name().to_string();
            if property.is_required {
                document.add_required(&json_name);
            }
            let inline = property.is_ref && self.config.repeated_defs;
            document.properties.insert(json_name, property);

            if inline {
                if let Kind::Message(target) = field.kind() {
                    self.inline_definition(&mut document, &target);
                }
            }
        }

        if annotations.is_some_and(|a| a.all_fields_required) {
            document.required = message
                .fields()
                .map(|field| field.json_name().to_string())
                .collect();
        }

        document
    }

    /// Derive the schema node for `field`
    ///
    /// `top_level` is false only when deriving the items of a repeated field.
    /// Returns `None` when the field must be left out of the schema.
    pub fn derive_property(
        &self,
        field: &FieldDescriptor,
        annotations: Option<&FieldAnnotations>,
        top_level: bool,
    ) -> Option<PropertyNode> {
        if annotations.is_some_and(|a| a.ignore) {
            return None;
        }

        if let Some(target) = annotations.and_then(FieldAnnotations::reference) {
            let mut node = PropertyNode::reference(target);
            node.is_required = annotations.is_some_and(|a| a.required);
            return Some(node);
        }

        let mut node = if top_level && field.is_list() {
            // Items get no annotations: they describe the field as a whole
            PropertyNode::array(self.derive_property(field, None, false)?)
        } else if field.is_map() {
            PropertyNode::typed(JsonType::Object)
        } else {
            self.derive_value(field)?
        };

        // A definition item already carries the message's own description
        if top_level || !node.is_ref {
            node.description = field_description(field);
        }

        if let Some(annotations) = annotations {
            apply_constraints(&mut node, annotations);
        }

        Some(node)
    }

    /// Shape of a single, non-repeated value of `field`
    fn derive_value(&self, field: &FieldDescriptor) -> Option<PropertyNode> {
        if field.is_group() {
            return None;
        }

        match TypeMapper::map_kind(field.kind()) {
            MappedType::Scalar {
                json_type,
                format: Some(format),
            } => Some(PropertyNode::formatted(json_type, format)),
            MappedType::Scalar {
                json_type,
                format: None,
            } => Some(PropertyNode::typed(json_type)),
            MappedType::Enum(enum_desc) => Some(self.enum_node(&enum_desc)),
            MappedType::WellKnown(well_known) => well_known_node(well_known),
            MappedType::Message(target) => {
                let mut node = PropertyNode::reference(self.reference_target(&target));
                node.is_ref = true;
                Some(node)
            }
        }
    }

    fn enum_node(&self, enum_desc: &EnumDescriptor) -> PropertyNode {
        match self.config.enum_type {
            EnumType::String => PropertyNode {
                enum_values: enum_desc
                    .values()
                    .map(|value| EnumValue::Name(value.name().to_string()))
                    .collect(),
                ..PropertyNode::typed(JsonType::String)
            },
            EnumType::Integer => PropertyNode {
                enum_values: enum_desc
                    .values()
                    .map(|value| EnumValue::Number(value.number()))
                    .collect(),
                ..PropertyNode::formatted(JsonType::Integer, "int32")
            },
        }
    }

    fn reference_target(&self, target: &MessageDescriptor) -> String {
        if self.config.repeated_defs {
            format!("#/definitions/{}", target.name())
        } else {
            format!("{}.json", target.name())
        }
    }

    /// Derive `target` and store it, with its own definitions hoisted, in
    /// `document.definitions`
    fn inline_definition(&mut self, document: &mut SchemaDocument, target: &MessageDescriptor) {
        let name = target.name();
        if self.in_progress.contains(target.full_name()) {
            tracing::debug!(
                message = target.full_name(),
                "cyclic reference, leaving a plain $ref"
            );
            return;
        }
        if let Some(existing) = self.inlined.get(name) {
            if existing != target.full_name() {
                tracing::warn!(
                    message = target.full_name(),
                    definition = name,
                    existing = %existing,
                    "definition name already taken by another message, skipping it"
                );
            }
            return;
        }

        let annotations = self.resolver.message_annotations(target);
        if annotations.as_ref().is_some_and(|a| a.ignore) {
            tracing::debug!(
                message = target.full_name(),
                "referenced message is ignored, no definition inlined"
            );
            return;
        }

        self.inlined
            .insert(name.to_string(), target.full_name().to_string());
        self.in_progress.insert(target.full_name().to_string());
        let mut definition = self.derive_document(
            target,
            annotations.as_ref(),
            SchemaDocument::definition(message_description(target)),
        );
        self.in_progress.remove(target.full_name());

        document
            .definitions
            .extend(std::mem::take(&mut definition.definitions));
        document.definitions.insert(name.to_string(), definition);
    }
}

fn well_known_node(well_known: WellKnownType) -> Option<PropertyNode> {
    match well_known {
        WellKnownType::Struct => Some(PropertyNode::typed(JsonType::Object)),
        WellKnownType::Any => {
            let mut node = PropertyNode::typed(JsonType::Object);
            node.properties
                .insert("@type".to_string(), PropertyNode::typed(JsonType::String));
            node.properties
                .insert("value".to_string(), PropertyNode::typed(JsonType::String));
            node.required = vec!["@type".to_string(), "value".to_string()];
            Some(node)
        }
        WellKnownType::Empty => None,
        WellKnownType::Timestamp => Some(PropertyNode::formatted(JsonType::String, "date-time")),
    }
}

fn apply_constraints(node: &mut PropertyNode, annotations: &FieldAnnotations) {
    node.is_required = annotations.required;

    if let Some(min_length) = annotations.min_length() {
        node.min_length = Some(min_length);
    }
    if let Some(max_length) = annotations.max_length() {
        node.max_length = Some(max_length);
    }
    if let Some(min_items) = annotations.min_items() {
        node.min_items = Some(min_items);
    }
    if let Some(pattern) = annotations.pattern() {
        node.pattern = Some(pattern.to_string());
    }
    // The type table's format wins
    if node.format.is_none() {
        if let Some(format) = annotations.format() {
            node.format = Some(format.to_string());
        }
    }
}
