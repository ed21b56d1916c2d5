//! Common types and utilities for protoc-gen-jsonschema
//!
//! This crate contains the JSON Schema document model, the generator
//! configuration and the error types shared by the parser, generator, and
//! CLI components.

mod config;
mod schema;

pub use config::{EnumType, GeneratorConfig};
pub use schema::{EnumValue, JsonType, PropertyNode, SchemaDocument, SCHEMA_DIALECT};

use thiserror::Error;

/// Errors that can occur during schema generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid parameter: {0}")]
    Parameter(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
