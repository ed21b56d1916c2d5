//! Descriptor sources for schema generation

use super::options::{strip_annotations, AnnotationPayloads};
use crate::annotations::{ExtensionResolver, OPTIONS_PACKAGE};
use prost::Message;
use prost_reflect::{DescriptorPool, MessageDescriptor};
use protoc_gen_jsonschema_common::{GeneratorError, Result};
use std::fs;
use std::path::Path;

/// `google.protobuf.compiler.CodeGeneratorRequest`, keeping the files as raw bytes
///
/// Decoding `proto_file` into `prost_types` structs would drop the option
/// extensions, so the files stay encoded until their annotations are cut out.
#[derive(Clone, PartialEq, Message)]
struct RawCodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    parameter: Option<String>,
    #[prost(bytes = "vec", repeated, tag = "15")]
    proto_file: Vec<Vec<u8>>,
}

/// `google.protobuf.FileDescriptorSet` with undecoded files
#[derive(Clone, PartialEq, Message)]
struct RawFileDescriptorSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    file: Vec<Vec<u8>>,
}

/// Descriptors plus the selection of files to generate schemas for
#[derive(Debug, Clone)]
pub struct DescriptorSource {
    /// Descriptor pool for reflection, without the annotation extensions
    pool: DescriptorPool,

    /// Annotation payloads removed from the pool's options
    annotations: AnnotationPayloads,

    /// Proto file names whose messages get a schema
    files_to_generate: Vec<String>,

    /// Raw plugin parameter, if protoc passed one
    parameter: Option<String>,
}

impl DescriptorSource {
    /// Decode a `CodeGeneratorRequest` as read from a plugin's stdin
    pub fn from_code_generator_request(bytes: &[u8]) -> Result<Self> {
        let request = RawCodeGeneratorRequest::decode(bytes).map_err(|e| {
            GeneratorError::Parse(format!("Failed to decode CodeGeneratorRequest: {}", e))
        })?;

        let (pool, annotations) = build_pool(&request.proto_file)?;

        Ok(Self {
            pool,
            annotations,
            files_to_generate: request.file_to_generate,
            parameter: request.parameter.filter(|p| !p.is_empty()),
        })
    }

    /// Load a `FileDescriptorSet` from a binary file
    ///
    /// # Example
    /// ```rust,ignore
    /// let source = DescriptorSource::from_file("api.pb", &["shop/user.proto".to_string()])?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P, files: &[String]) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read FileDescriptorSet file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_file_descriptor_set(&bytes, files)
    }

    /// Decode a `FileDescriptorSet`
    ///
    /// With an empty `files` list every file in the set is selected, except
    /// `google/protobuf/*` and the file declaring the annotation options.
    pub fn from_file_descriptor_set(bytes: &[u8], files: &[String]) -> Result<Self> {
        let set = RawFileDescriptorSet::decode(bytes).map_err(|e| {
            GeneratorError::Parse(format!("Failed to decode FileDescriptorSet: {}", e))
        })?;
        let (pool, annotations) = build_pool(&set.file)?;

        let files_to_generate = if files.is_empty() {
            pool.files()
                .filter(|file| {
                    !file.name().starts_with("google/protobuf/")
                        && file.package_name() != OPTIONS_PACKAGE
                })
                .map(|file| file.name().to_string())
                .collect()
        } else {
            files.to_vec()
        };

        Ok(Self {
            pool,
            annotations,
            files_to_generate,
            parameter: None,
        })
    }

    /// Top-level messages of the selected files, in file then declaration order
    pub fn messages_to_generate(&self) -> Result<Vec<MessageDescriptor>> {
        let mut messages = Vec::new();
        for name in &self.files_to_generate {
            let file = self.pool.get_file_by_name(name).ok_or_else(|| {
                GeneratorError::Parse(format!("File to generate not found in descriptors: {}", name))
            })?;
            messages.extend(file.messages());
        }
        Ok(messages)
    }

    /// Get reference to the underlying descriptor pool
    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }

    /// Annotation payloads, keyed by file and element path
    pub fn annotations(&self) -> &AnnotationPayloads {
        &self.annotations
    }

    /// Resolver reading this source's annotations
    pub fn annotation_resolver(&self) -> ExtensionResolver<'_> {
        ExtensionResolver::new(&self.pool, &self.annotations)
    }

    pub fn files_to_generate(&self) -> &[String] {
        &self.files_to_generate
    }

    /// Plugin parameter (`--jsonschema_opt`), `None` when empty
    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }
}

/// Cut the annotations out of `files` and build a pool from what is left
fn build_pool(files: &[Vec<u8>]) -> Result<(DescriptorPool, AnnotationPayloads)> {
    let (file, annotations) = strip_annotations(files)?;
    tracing::debug!(files = file.len(), annotations = annotations.len(), "decoding descriptors");

    let set = RawFileDescriptorSet { file };
    let pool = DescriptorPool::decode(set.encode_to_vec().as_slice())
        .map_err(|e| GeneratorError::Parse(format!("Failed to build DescriptorPool: {}", e)))?;
    Ok((pool, annotations))
}
