//! Protobuf descriptor loading
//!
//! Builds a [`prost_reflect::DescriptorPool`], with the JSON Schema annotations
//! set aside in [`AnnotationPayloads`], from one of two inputs:
//!
//! - **CodeGeneratorRequest**: what protoc writes to a plugin's stdin
//! - **FileDescriptorSet**: `protoc --descriptor_set_out=... --include_imports
//!   --include_source_info`, for running outside of protoc
//!
//! ## Example
//! ```rust,ignore
//! use protoc_gen_jsonschema_parser::DescriptorSource;
//!
//! let source = DescriptorSource::from_file("api.pb", &[])?;
//! for message in source.messages_to_generate()? {
//!     println!("{}", message.full_name());
//! }
//! ```

mod options;
mod parser;

pub use options::AnnotationPayloads;
pub use parser::DescriptorSource;
