//! Descriptor parsing for protoc-gen-jsonschema
//!
//! This crate turns protoc's input into a descriptor pool and reads the JSON
//! Schema annotations attached to messages and fields.
//!
//! ## Annotations
//!
//! Field annotations (`(protoc.gen.jsonschema.field_options)`):
//! - `ignore`, `required`, `ref`
//! - `min_length`, `max_length`, `pattern`, `format`, `min_items`
//!
//! Message annotations (`(protoc.gen.jsonschema.message_options)`):
//! - `ignore`, `all_fields_required`, `id`

mod annotations;
mod comments;
mod protobuf;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use annotations::{
    AnnotationResolver, ExtensionResolver, FieldAnnotations, MessageAnnotations, NoAnnotations,
    FIELD_OPTIONS_EXTENSION, FIELD_OPTIONS_NUMBER, MESSAGE_OPTIONS_EXTENSION,
    MESSAGE_OPTIONS_NUMBER, OPTIONS_PACKAGE,
};
pub use comments::{field_description, message_description, reformat_comment};
pub use protobuf::{AnnotationPayloads, DescriptorSource};
