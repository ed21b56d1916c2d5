//! JSON Schema generation for protobuf messages
//!
//! This crate derives one JSON Schema document per top-level message and
//! hands the serialized documents to an [`OutputSink`]:
//! - [`ResponseSink`] for protoc plugin responses
//! - [`DirectorySink`] for writing files directly

mod builder;
mod sink;
mod type_mapper;

pub use builder::SchemaBuilder;
pub use sink::{DirectorySink, OutputSink, ResponseSink};
pub use type_mapper::{MappedType, TypeMapper, WellKnownType};

use prost_reflect::MessageDescriptor;
use prost_types::compiler::CodeGeneratorResponse;
use protoc_gen_jsonschema_common::{GeneratorConfig, Result};
use protoc_gen_jsonschema_parser::{AnnotationResolver, DescriptorSource};

/// Schema generator
///
/// Runs one generation pass over a list of messages, writing
/// `<MessageName>.json` for every message that is not ignored.
pub struct SchemaGenerator<R> {
    config: GeneratorConfig,
    resolver: R,
}

impl<R: AnnotationResolver> SchemaGenerator<R> {
    /// Create a new generator with explicit configuration and annotation source
    pub fn new(config: GeneratorConfig, resolver: R) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate schemas for `messages` into `sink`
    ///
    /// Returns the number of files emitted. The first sink or serialization
    /// error aborts the pass.
    pub fn generate(
        &self,
        messages: &[MessageDescriptor],
        sink: &mut dyn OutputSink,
    ) -> Result<usize> {
        let mut builder = SchemaBuilder::new(self.config, &self.resolver);
        let mut emitted = 0;

        for message in messages {
            let Some(document) = builder.build(message) else {
                continue;
            };

            let file_name = format!("{}.json", message.name());
            sink.emit(&file_name, document.to_pretty_json()?)?;
            tracing::info!(message = message.full_name(), file = %file_name, "generated schema");
            emitted += 1;
        }

        Ok(emitted)
    }
}

/// Generate schemas for every selected message of `source`, with the
/// annotations it carries
pub fn generate_from_source(
    source: &DescriptorSource,
    config: GeneratorConfig,
    sink: &mut dyn OutputSink,
) -> Result<usize> {
    let resolver = source.annotation_resolver();
    if !resolver.is_enabled() {
        tracing::debug!("annotation options not found in descriptors, annotations disabled");
    }

    let generator = SchemaGenerator::new(config, resolver);
    generator.generate(&source.messages_to_generate()?, sink)
}

/// Run the plugin on an encoded `CodeGeneratorRequest`
///
/// An undecodable request is returned as `Err`. Configuration and generation
/// failures are reported in the response's `error` field, which makes protoc
/// fail the run.
pub fn generate_from_request(bytes: &[u8]) -> Result<CodeGeneratorResponse> {
    let source = DescriptorSource::from_code_generator_request(bytes)?;
    let mut sink = ResponseSink::new();

    let outcome = GeneratorConfig::from_parameter(source.parameter().unwrap_or_default())
        .and_then(|config| generate_from_source(&source, config, &mut sink));

    match outcome {
        Ok(_) => Ok(sink.into_response()),
        Err(err) => {
            tracing::error!(error = %err, "schema generation failed");
            Ok(ResponseSink::error_response(err.to_string()))
        }
    }
}
