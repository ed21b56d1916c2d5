//! Builders for annotated descriptor sets
//!
//! `prost-types` drops unknown fields, so descriptors built from its structs
//! cannot carry the annotation extensions. These helpers encode the
//! `prost-types` parts and splice the option extensions into the wire bytes,
//! producing exactly what protoc would send.

use crate::annotations::{
    FieldAnnotations, MessageAnnotations, FIELD_OPTIONS_NUMBER, MESSAGE_OPTIONS_NUMBER,
    OPTIONS_PACKAGE,
};
use prost::encoding::{encode_key, encode_varint, WireType};
use prost::Message;
use prost_types::descriptor_proto::ExtensionRange;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::source_code_info::Location;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MessageOptions, SourceCodeInfo,
};

/// Import path of the annotation definitions
pub const OPTIONS_FILE: &str = "protoc-gen-jsonschema/options.proto";

const DESCRIPTOR_FILE: &str = "google/protobuf/descriptor.proto";

#[derive(Clone, PartialEq, Message)]
struct FieldOptionsCarrier {
    #[prost(message, optional, tag = "1125")]
    field_options: Option<FieldAnnotations>,
}

#[derive(Clone, PartialEq, Message)]
struct MessageOptionsCarrier {
    #[prost(message, optional, tag = "1127")]
    message_options: Option<MessageAnnotations>,
}

fn push_len_delimited(tag: u32, payload: &[u8], buf: &mut Vec<u8>) {
    encode_key(tag, WireType::LengthDelimited, buf);
    encode_varint(payload.len() as u64, buf);
    buf.extend_from_slice(payload);
}

/// `google.protobuf.FieldOptions` holding extension 1125 as a message
pub fn field_options_payload(payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    push_len_delimited(FIELD_OPTIONS_NUMBER, payload, &mut buf);
    buf
}

/// `google.protobuf.FieldOptions` holding extension 1125 as a varint
pub fn field_options_varint(value: u64) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_key(FIELD_OPTIONS_NUMBER, WireType::Varint, &mut buf);
    encode_varint(value, &mut buf);
    buf
}

/// A message whose fields may carry annotations
#[derive(Debug, Clone, Default)]
pub struct TestMessage {
    proto: DescriptorProto,
    annotations: Option<MessageAnnotations>,
    /// Fields with their encoded `FieldOptions`
    fields: Vec<(FieldDescriptorProto, Option<Vec<u8>>)>,
    nested: Vec<TestMessage>,
}

impl TestMessage {
    pub fn new(name: &str) -> Self {
        Self {
            proto: DescriptorProto {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn field(mut self, field: FieldDescriptorProto) -> Self {
        self.fields.push((field, None));
        self
    }

    pub fn field_annotated(self, field: FieldDescriptorProto, annotations: FieldAnnotations) -> Self {
        let options = FieldOptionsCarrier {
            field_options: Some(annotations),
        };
        self.field_with_options(field, options.encode_to_vec())
    }

    /// Attach already encoded `FieldOptions`, e.g. from [`field_options_varint`]
    pub fn field_with_options(mut self, field: FieldDescriptorProto, options: Vec<u8>) -> Self {
        self.fields.push((field, Some(options)));
        self
    }

    pub fn annotated(mut self, annotations: MessageAnnotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Declare a nested type, e.g. a map entry from [`map_entry`]
    pub fn nested(mut self, message: DescriptorProto) -> Self {
        self.proto.nested_type.push(message);
        self
    }

    /// Declare a nested type that may carry annotations
    ///
    /// Encoded after the types added with [`TestMessage::nested`].
    pub fn nested_message(mut self, message: TestMessage) -> Self {
        self.nested.push(message);
        self
    }

    fn encode(&self) -> Vec<u8> {
        let mut buf = self.proto.encode_to_vec();
        for (field, options) in &self.fields {
            let mut field_bytes = field.encode_to_vec();
            if let Some(options) = options {
                push_len_delimited(8, options, &mut field_bytes);
            }
            push_len_delimited(2, &field_bytes, &mut buf);
        }
        for message in &self.nested {
            push_len_delimited(3, &message.encode(), &mut buf);
        }
        if let Some(annotations) = &self.annotations {
            let options = MessageOptionsCarrier {
                message_options: Some(annotations.clone()),
            };
            push_len_delimited(7, &options.encode_to_vec(), &mut buf);
        }
        buf
    }
}

/// A `.proto` file under construction
#[derive(Debug, Clone, Default)]
pub struct TestFile {
    proto: FileDescriptorProto,
    messages: Vec<TestMessage>,
}

impl TestFile {
    /// Empty proto3 file
    pub fn new(name: &str, package: &str) -> Self {
        Self::from_proto(FileDescriptorProto {
            name: Some(name.to_string()),
            package: Some(package.to_string()),
            syntax: Some("proto3".to_string()),
            ..Default::default()
        })
    }

    /// Wrap a plain descriptor that needs no annotations
    pub fn from_proto(proto: FileDescriptorProto) -> Self {
        Self {
            proto,
            messages: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.proto.name()
    }

    pub fn syntax(mut self, syntax: &str) -> Self {
        self.proto.syntax = Some(syntax.to_string());
        self
    }

    pub fn import(mut self, dependency: &str) -> Self {
        self.proto.dependency.push(dependency.to_string());
        self
    }

    pub fn message(mut self, message: TestMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn enumeration(mut self, enumeration: EnumDescriptorProto) -> Self {
        self.proto.enum_type.push(enumeration);
        self
    }

    /// Attach a leading comment to the element at `path`
    ///
    /// See [`message_path`] and [`field_path`].
    pub fn comment(mut self, path: Vec<i32>, text: &str) -> Self {
        let info = self
            .proto
            .source_code_info
            .get_or_insert_with(SourceCodeInfo::default);
        info.location.push(Location {
            path,
            span: vec![0, 0, 0],
            leading_comments: Some(text.to_string()),
            ..Default::default()
        });
        self
    }

    /// Wire encoding of the `FileDescriptorProto`
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = self.proto.encode_to_vec();
        for message in &self.messages {
            push_len_delimited(4, &message.encode(), &mut buf);
        }
        buf
    }
}

/// Source path of the `index`-th top-level message
pub fn message_path(index: i32) -> Vec<i32> {
    vec![4, index]
}

/// Source path of a field within a top-level message
pub fn field_path(message_index: i32, field_index: i32) -> Vec<i32> {
    vec![4, message_index, 2, field_index]
}

fn json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn base_field(name: &str, number: i32, label: Label, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(ty as i32),
        json_name: Some(json_name(name)),
        ..Default::default()
    }
}

/// Singular scalar field
pub fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    base_field(name, number, Label::Optional, ty)
}

/// Repeated scalar field
pub fn repeated(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    base_field(name, number, Label::Repeated, ty)
}

/// Singular field of message type `type_name` (fully qualified, leading dot)
pub fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..base_field(name, number, Label::Optional, Type::Message)
    }
}

/// Repeated field of message type `type_name`
pub fn repeated_message(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..base_field(name, number, Label::Repeated, Type::Message)
    }
}

/// Singular field of enum type `type_name`
pub fn enum_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..base_field(name, number, Label::Optional, Type::Enum)
    }
}

/// Synthetic `map_entry` message for a `map<key, value>` field
pub fn map_entry(name: &str, key: Type, value: Type) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: vec![field("key", 1, key), field("value", 2, value)],
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Enum declaration with `(name, number)` values in order
pub fn enumeration(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .map(|(value, number)| EnumValueDescriptorProto {
                name: Some(value.to_string()),
                number: Some(*number),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn extendable(name: &str) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        extension_range: vec![ExtensionRange {
            start: Some(1000),
            end: Some(536_870_912),
            options: None,
        }],
        ..Default::default()
    }
}

/// Reduced `google/protobuf/descriptor.proto` holding the two extendees
pub fn descriptor_proto() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(DESCRIPTOR_FILE.to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![extendable("FieldOptions"), extendable("MessageOptions")],
        ..Default::default()
    }
}

fn extension(name: &str, number: u32, type_name: &str, extendee: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        extendee: Some(extendee.to_string()),
        ..base_field(name, number as i32, Label::Optional, Type::Message)
    }
}

/// The annotation definitions
pub fn options_proto() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(OPTIONS_FILE.to_string()),
        package: Some(OPTIONS_PACKAGE.to_string()),
        dependency: vec![DESCRIPTOR_FILE.to_string()],
        message_type: vec![
            DescriptorProto {
                name: Some("FieldOptions".to_string()),
                field: vec![
                    field("ignore", 1, Type::Bool),
                    field("required", 2, Type::Bool),
                    field("min_length", 3, Type::Int32),
                    field("max_length", 4, Type::Int32),
                    field("pattern", 5, Type::String),
                    field("ref", 6, Type::String),
                    field("min_items", 7, Type::Int32),
                    field("format", 8, Type::String),
                ],
                ..Default::default()
            },
            DescriptorProto {
                name: Some("MessageOptions".to_string()),
                field: vec![
                    field("ignore", 1, Type::Bool),
                    field("all_fields_required", 2, Type::Bool),
                    field("id", 3, Type::String),
                ],
                ..Default::default()
            },
        ],
        extension: vec![
            extension(
                "field_options",
                FIELD_OPTIONS_NUMBER,
                ".protoc.gen.jsonschema.FieldOptions",
                ".google.protobuf.FieldOptions",
            ),
            extension(
                "message_options",
                MESSAGE_OPTIONS_NUMBER,
                ".protoc.gen.jsonschema.MessageOptions",
                ".google.protobuf.MessageOptions",
            ),
        ],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn well_known(file: &str, message: DescriptorProto) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(format!("google/protobuf/{}", file)),
        package: Some("google.protobuf".to_string()),
        message_type: vec![message],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// `Timestamp`, `Any`, `Struct` and `Empty`, reduced to what the generator inspects
pub fn well_known_types() -> Vec<FileDescriptorProto> {
    vec![
        well_known(
            "timestamp.proto",
            DescriptorProto {
                name: Some("Timestamp".to_string()),
                field: vec![field("seconds", 1, Type::Int64), field("nanos", 2, Type::Int32)],
                ..Default::default()
            },
        ),
        well_known(
            "any.proto",
            DescriptorProto {
                name: Some("Any".to_string()),
                field: vec![field("type_url", 1, Type::String), field("value", 2, Type::Bytes)],
                ..Default::default()
            },
        ),
        well_known(
            "struct.proto",
            DescriptorProto {
                name: Some("Struct".to_string()),
                ..Default::default()
            },
        ),
        well_known(
            "empty.proto",
            DescriptorProto {
                name: Some("Empty".to_string()),
                ..Default::default()
            },
        ),
    ]
}

/// `file` preceded by everything it may import
///
/// `file` is made to import the annotation definitions and every well-known type.
pub fn with_dependencies(file: TestFile) -> Vec<TestFile> {
    with_options_file(file, options_proto())
}

/// Like [`with_dependencies`], with `options` standing in for the annotation
/// definitions
///
/// `options` must keep the name [`OPTIONS_FILE`].
pub fn with_options_file(file: TestFile, options: FileDescriptorProto) -> Vec<TestFile> {
    let mut files = vec![
        TestFile::from_proto(descriptor_proto()),
        TestFile::from_proto(options),
    ];
    files.extend(well_known_types().into_iter().map(TestFile::from_proto));

    let mut file = file.import(OPTIONS_FILE);
    for dependency in well_known_types() {
        file = file.import(dependency.name());
    }
    files.push(file);
    files
}

/// Encode `files` as a `FileDescriptorSet`
pub fn encode_file_descriptor_set(files: &[TestFile]) -> Vec<u8> {
    let mut buf = Vec::new();
    for file in files {
        push_len_delimited(1, &file.encode(), &mut buf);
    }
    buf
}

/// Encode a `CodeGeneratorRequest` carrying `files`
pub fn encode_code_generator_request(
    files_to_generate: &[&str],
    parameter: Option<&str>,
    files: &[TestFile],
) -> Vec<u8> {
    let mut buf = Vec::new();
    for name in files_to_generate {
        push_len_delimited(1, name.as_bytes(), &mut buf);
    }
    if let Some(parameter) = parameter {
        push_len_delimited(2, parameter.as_bytes(), &mut buf);
    }
    for file in files {
        push_len_delimited(15, &file.encode(), &mut buf);
    }
    buf
}
