//! JSON Schema annotations attached to protobuf descriptors
//!
//! Annotations are declared in `proto/protoc-gen-jsonschema/options.proto`
//! as two extensions:
//!
//! ```proto
//! extend google.protobuf.FieldOptions   { FieldOptions field_options = 1125; }
//! extend google.protobuf.MessageOptions { MessageOptions message_options = 1127; }
//! ```
//!
//! A missing or unreadable annotation is never an error: resolvers return
//! `None` and generation proceeds as if nothing was attached. The payloads
//! are cut out of the descriptors before the pool is built (see
//! [`AnnotationPayloads`]) so that a malformed one only affects its element.

use crate::protobuf::AnnotationPayloads;
use prost_reflect::{DescriptorPool, DynamicMessage, FieldDescriptor, Kind, MessageDescriptor};

/// Package of the option messages
pub const OPTIONS_PACKAGE: &str = "protoc.gen.jsonschema";

/// Full name of the field-level extension
pub const FIELD_OPTIONS_EXTENSION: &str = "protoc.gen.jsonschema.field_options";

/// Full name of the message-level extension
pub const MESSAGE_OPTIONS_EXTENSION: &str = "protoc.gen.jsonschema.message_options";

/// Field number of `field_options` on `google.protobuf.FieldOptions`
pub const FIELD_OPTIONS_NUMBER: u32 = 1125;

/// Field number of `message_options` on `google.protobuf.MessageOptions`
pub const MESSAGE_OPTIONS_NUMBER: u32 = 1127;

/// `protoc.gen.jsonschema.FieldOptions`
#[derive(Clone, PartialEq, prost::Message)]
pub struct FieldAnnotations {
    /// Leave the field out of the schema
    #[prost(bool, tag = "1")]
    pub ignore: bool,
    /// List the field under `required`
    #[prost(bool, tag = "2")]
    pub required: bool,
    #[prost(int32, tag = "3")]
    pub min_length: i32,
    #[prost(int32, tag = "4")]
    pub max_length: i32,
    #[prost(string, tag = "5")]
    pub pattern: String,
    /// Replace the derived schema with a `$ref`
    #[prost(string, tag = "6")]
    pub r#ref: String,
    #[prost(int32, tag = "7")]
    pub min_items: i32,
    #[prost(string, tag = "8")]
    pub format: String,
}

impl FieldAnnotations {
    /// Explicit `$ref` target, if set
    pub fn reference(&self) -> Option<&str> {
        non_empty(&self.r#ref)
    }

    pub fn min_length(&self) -> Option<u32> {
        positive(self.min_length)
    }

    pub fn max_length(&self) -> Option<u32> {
        positive(self.max_length)
    }

    pub fn min_items(&self) -> Option<u32> {
        positive(self.min_items)
    }

    pub fn pattern(&self) -> Option<&str> {
        non_empty(&self.pattern)
    }

    pub fn format(&self) -> Option<&str> {
        non_empty(&self.format)
    }
}

/// `protoc.gen.jsonschema.MessageOptions`
#[derive(Clone, PartialEq, prost::Message)]
pub struct MessageAnnotations {
    /// Produce no document for the message
    #[prost(bool, tag = "1")]
    pub ignore: bool,
    /// Mark every declared field as required
    #[prost(bool, tag = "2")]
    pub all_fields_required: bool,
    /// Override the document `$id`
    #[prost(string, tag = "3")]
    pub id: String,
}

impl MessageAnnotations {
    pub fn id(&self) -> Option<&str> {
        non_empty(&self.id)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

fn positive(value: i32) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| *v > 0)
}

/// Source of per-field and per-message annotations
pub trait AnnotationResolver {
    /// Annotations attached to `field`, if any
    fn field_annotations(&self, field: &FieldDescriptor) -> Option<FieldAnnotations>;

    /// Annotations attached to `message`, if any
    fn message_annotations(&self, message: &MessageDescriptor) -> Option<MessageAnnotations>;
}

/// Resolver that never finds annotations
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnnotations;

impl AnnotationResolver for NoAnnotations {
    fn field_annotations(&self, _field: &FieldDescriptor) -> Option<FieldAnnotations> {
        None
    }

    fn message_annotations(&self, _message: &MessageDescriptor) -> Option<MessageAnnotations> {
        None
    }
}

/// Reads annotations from the payloads removed from a pool's options
///
/// The annotation messages are decoded with the option types declared in the
/// pool, then transcoded into [`FieldAnnotations`] / [`MessageAnnotations`].
#[derive(Debug, Clone)]
pub struct ExtensionResolver<'a> {
    field_shape: Option<MessageDescriptor>,
    message_shape: Option<MessageDescriptor>,
    payloads: &'a AnnotationPayloads,
}

impl<'a> ExtensionResolver<'a> {
    /// Look up both extensions in `pool`
    ///
    /// An extension that is missing, or declared with an unexpected extendee,
    /// number or type, is disabled and every lookup through it yields `None`.
    pub fn new(pool: &DescriptorPool, payloads: &'a AnnotationPayloads) -> Self {
        Self {
            field_shape: lookup_extension(
                pool,
                FIELD_OPTIONS_EXTENSION,
                FIELD_OPTIONS_NUMBER,
                "google.protobuf.FieldOptions",
            ),
            message_shape: lookup_extension(
                pool,
                MESSAGE_OPTIONS_EXTENSION,
                MESSAGE_OPTIONS_NUMBER,
                "google.protobuf.MessageOptions",
            ),
            payloads,
        }
    }

    /// Whether the pool defines at least one of the annotation extensions
    pub fn is_enabled(&self) -> bool {
        self.field_shape.is_some() || self.message_shape.is_some()
    }

    fn read<T>(&self, shape: &MessageDescriptor, file: &str, path: &[i32], owner: &str) -> Option<T>
    where
        T: prost::Message + Default,
    {
        let payload = self.payloads.get(file, path)?;

        let message = match DynamicMessage::decode(shape.clone(), payload) {
            Ok(message) => message,
            Err(err) => {
                tracing::debug!(%owner, error = %err, "undecodable annotation, treating as absent");
                return None;
            }
        };

        match message.transcode_to::<T>() {
            Ok(annotations) => Some(annotations),
            Err(err) => {
                tracing::debug!(%owner, error = %err, "unreadable annotation, treating as absent");
                None
            }
        }
    }
}

impl AnnotationResolver for ExtensionResolver<'_> {
    fn field_annotations(&self, field: &FieldDescriptor) -> Option<FieldAnnotations> {
        let shape = self.field_shape.as_ref()?;
        let file = field.parent_message().parent_file();
        self.read(shape, file.name(), field.path(), field.full_name())
    }

    fn message_annotations(&self, message: &MessageDescriptor) -> Option<MessageAnnotations> {
        let shape = self.message_shape.as_ref()?;
        let file = message.parent_file();
        self.read(shape, file.name(), message.path(), message.full_name())
    }
}

/// Message type of extension `name`, if it is declared the way the options file does
fn lookup_extension(
    pool: &DescriptorPool,
    name: &str,
    number: u32,
    extendee: &str,
) -> Option<MessageDescriptor> {
    let extension = pool.get_extension_by_name(name)?;

    if extension.containing_message().full_name() != extendee || extension.number() != number {
        tracing::debug!(
            extension = name,
            extendee = extension.containing_message().full_name(),
            number = extension.number(),
            "annotation extension is declared on an unexpected extendee, ignoring it"
        );
        return None;
    }

    match extension.kind() {
        Kind::Message(shape) if !extension.is_list() => Some(shape),
        _ => {
            tracing::debug!(
                extension = name,
                "annotation extension is not a singular message, ignoring it"
            );
            None
        }
    }
}
