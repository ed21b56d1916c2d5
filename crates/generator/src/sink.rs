//! Destinations for generated schema files

use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::CodeGeneratorResponse;
use protoc_gen_jsonschema_common::{GeneratorError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Receives generated files
pub trait OutputSink {
    /// Register `content` under `file_name`
    ///
    /// Any error aborts the whole generation pass.
    fn emit(&mut self, file_name: &str, content: String) -> Result<()>;
}

/// Collects files into a `CodeGeneratorResponse` for protoc
#[derive(Debug, Default)]
pub struct ResponseSink {
    files: Vec<File>,
}

impl ResponseSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Response carrying every emitted file
    pub fn into_response(self) -> CodeGeneratorResponse {
        CodeGeneratorResponse {
            file: self.files,
            supported_features: Some(Feature::Proto3Optional as u64),
            ..Default::default()
        }
    }

    /// Response reporting a failed generation; protoc prints `message` and fails
    pub fn error_response(message: impl Into<String>) -> CodeGeneratorResponse {
        CodeGeneratorResponse {
            error: Some(message.into()),
            supported_features: Some(Feature::Proto3Optional as u64),
            ..Default::default()
        }
    }
}

impl OutputSink for ResponseSink {
    fn emit(&mut self, file_name: &str, content: String) -> Result<()> {
        if self.files.iter().any(|file| file.name() == file_name) {
            return Err(GeneratorError::Generation(format!(
                "Duplicate output file {}",
                file_name
            )));
        }

        self.files.push(File {
            name: Some(file_name.to_string()),
            content: Some(content),
            ..Default::default()
        });
        Ok(())
    }
}

/// Writes files into a directory
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create `root` (and parents) if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to create output directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self {
            root,
            written: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths written so far, in emission order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl OutputSink for DirectorySink {
    fn emit(&mut self, file_name: &str, content: String) -> Result<()> {
        let path = self.root.join(file_name);
        if self.written.contains(&path) {
            return Err(GeneratorError::Generation(format!(
                "Duplicate output file {}",
                file_name
            )));
        }

        fs::write(&path, content).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write {}: {}", path.display(), e))
        })?;
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_sink_collects_files() {
        let mut sink = ResponseSink::new();
        sink.emit("User.json", "{}".to_string()).unwrap();
        sink.emit("Order.json", "{}".to_string()).unwrap();
        assert_eq!(sink.files().len(), 2);

        let response = sink.into_response();
        assert!(response.error.is_none());
        assert_eq!(response.file[0].name(), "User.json");
        assert_eq!(response.file[1].name(), "Order.json");
        assert_eq!(
            response.supported_features,
            Some(Feature::Proto3Optional as u64)
        );
    }

    #[test]
    fn test_response_sink_rejects_duplicates() {
        let mut sink = ResponseSink::new();
        sink.emit("User.json", "{}".to_string()).unwrap();
        let err = sink.emit("User.json", "{}".to_string()).unwrap_err();
        assert!(matches!(err, GeneratorError::Generation(_)));
    }

    #[test]
    fn test_error_response() {
        let response = ResponseSink::error_response("Invalid parameter: unknown option \"x\"");
        assert!(response.file.is_empty());
        assert_eq!(
            response.error.as_deref(),
            Some("Invalid parameter: unknown option \"x\"")
        );
    }

    #[test]
    fn test_directory_sink_writes_files() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let out = temp_dir.path().join("schemas");

        let mut sink = DirectorySink::new(&out).unwrap();
        sink.emit("User.json", "{\n    \"type\": \"object\"\n}".to_string())
            .unwrap();

        assert_eq!(sink.written(), [out.join("User.json")]);
        let content = fs::read_to_string(out.join("User.json")).unwrap();
        assert!(content.contains("\"type\": \"object\""));

        assert!(sink.emit("User.json", String::new()).is_err());
    }
}
