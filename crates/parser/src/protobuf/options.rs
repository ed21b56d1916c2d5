//! Annotation payloads cut out of raw descriptor bytes
//!
//! prost-reflect decodes options against the registered extensions while it
//! builds a pool, so a single malformed annotation would make the whole
//! request unreadable. Before the pool is built, the annotation extensions
//! are removed from every `FieldOptions` and `MessageOptions` and kept here,
//! keyed by file name and the source path of the annotated element.

use crate::annotations::{FIELD_OPTIONS_NUMBER, MESSAGE_OPTIONS_NUMBER};
use prost::encoding::{decode_key, decode_varint, encode_key, encode_varint, WireType};
use protoc_gen_jsonschema_common::{GeneratorError, Result};
use std::collections::HashMap;

// FileDescriptorProto
const FILE_NAME: u32 = 1;
const FILE_MESSAGE_TYPE: u32 = 4;
const FILE_EXTENSION: u32 = 7;

// DescriptorProto
const MESSAGE_FIELD: u32 = 2;
const MESSAGE_NESTED_TYPE: u32 = 3;
const MESSAGE_EXTENSION: u32 = 6;
const MESSAGE_OPTIONS: u32 = 7;

// FieldDescriptorProto
const FIELD_OPTIONS: u32 = 8;

/// Undecoded annotation messages by file and element path
#[derive(Debug, Clone, Default)]
pub struct AnnotationPayloads {
    files: HashMap<String, HashMap<Vec<i32>, Vec<u8>>>,
}

impl AnnotationPayloads {
    /// Encoded annotation of the element at `path` in `file`
    ///
    /// Paths follow `SourceCodeInfo`: `[4, m]` for a top-level message,
    /// `[4, m, 2, f]` for one of its fields, `[4, m, 3, n]` for a nested message.
    pub fn get(&self, file: &str, path: &[i32]) -> Option<&[u8]> {
        self.files.get(file)?.get(path).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.files.values().all(HashMap::is_empty)
    }

    pub fn len(&self) -> usize {
        self.files.values().map(HashMap::len).sum()
    }
}

/// Remove the annotation extensions from encoded `FileDescriptorProto`s
///
/// Returns the rewritten files, in order, and the payloads that were removed.
/// An annotation that is not length-delimited is dropped.
pub(crate) fn strip_annotations(files: &[Vec<u8>]) -> Result<(Vec<Vec<u8>>, AnnotationPayloads)> {
    let mut stripped = Vec::with_capacity(files.len());
    let mut payloads = AnnotationPayloads::default();

    for bytes in files {
        let mut found = HashMap::new();
        let (file, name) = strip_file(bytes, &mut found)?;
        stripped.push(file);

        let entries = payloads.files.entry(name).or_default();
        for (path, payload) in found {
            entries.entry(path).or_default().extend(payload);
        }
    }

    Ok((stripped, payloads))
}

type Found = HashMap<Vec<i32>, Vec<u8>>;

fn strip_file(bytes: &[u8], found: &mut Found) -> Result<(Vec<u8>, String)> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut name = String::new();
    let mut indices = HashMap::new();
    let mut rest = bytes;

    while !rest.is_empty() {
        let field = next_field(&mut rest)?;
        if field.wire_type != WireType::LengthDelimited {
            out.extend_from_slice(field.encoded);
            continue;
        }

        match field.number {
            FILE_NAME => {
                name = String::from_utf8(field.contents.to_vec()).map_err(|e| {
                    GeneratorError::Parse(format!("File descriptor name is not UTF-8: {}", e))
                })?;
                out.extend_from_slice(field.encoded);
            }
            FILE_MESSAGE_TYPE => {
                let path = child_path(&[], &mut indices, field.number);
                let message = strip_message(field.contents, &path, found)?;
                push_len_delimited(field.number, &message, &mut out);
            }
            FILE_EXTENSION => {
                let path = child_path(&[], &mut indices, field.number);
                let extension = strip_field(field.contents, &path, found)?;
                push_len_delimited(field.number, &extension, &mut out);
            }
            _ => out.extend_from_slice(field.encoded),
        }
    }

    Ok((out, name))
}

fn strip_message(bytes: &[u8], path: &[i32], found: &mut Found) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut indices = HashMap::new();
    let mut rest = bytes;

    while !rest.is_empty() {
        let field = next_field(&mut rest)?;
        if field.wire_type != WireType::LengthDelimited {
            out.extend_from_slice(field.encoded);
            continue;
        }

        let rewritten = match field.number {
            MESSAGE_FIELD | MESSAGE_EXTENSION => {
                let child = child_path(path, &mut indices, field.number);
                strip_field(field.contents, &child, found)?
            }
            MESSAGE_NESTED_TYPE => {
                let child = child_path(path, &mut indices, field.number);
                strip_message(field.contents, &child, found)?
            }
            MESSAGE_OPTIONS => {
                strip_options(field.contents, MESSAGE_OPTIONS_NUMBER, path, found)?
            }
            _ => {
                out.extend_from_slice(field.encoded);
                continue;
            }
        };
        push_len_delimited(field.number, &rewritten, &mut out);
    }

    Ok(out)
}

fn strip_field(bytes: &[u8], path: &[i32], found: &mut Found) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut rest = bytes;

    while !rest.is_empty() {
        let field = next_field(&mut rest)?;
        if field.number == FIELD_OPTIONS && field.wire_type == WireType::LengthDelimited {
            let options = strip_options(field.contents, FIELD_OPTIONS_NUMBER, path, found)?;
            push_len_delimited(field.number, &options, &mut out);
        } else {
            out.extend_from_slice(field.encoded);
        }
    }

    Ok(out)
}

/// Copy an options message without extension `number`, collecting its payload
///
/// Repeated occurrences are concatenated, which is how protobuf merges them.
fn strip_options(bytes: &[u8], number: u32, path: &[i32], found: &mut Found) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut rest = bytes;

    while !rest.is_empty() {
        let field = next_field(&mut rest)?;
        if field.number != number {
            out.extend_from_slice(field.encoded);
        } else if field.wire_type == WireType::LengthDelimited {
            found
                .entry(path.to_vec())
                .or_default()
                .extend_from_slice(field.contents);
        } else {
            tracing::debug!(
                ?path,
                extension = number,
                wire_type = ?field.wire_type,
                "annotation is not a message, dropping it"
            );
        }
    }

    Ok(out)
}

/// Path of the next child stored under field `number` of the element at `parent`
fn child_path(parent: &[i32], indices: &mut HashMap<u32, i32>, number: u32) -> Vec<i32> {
    let index = indices.entry(number).or_insert(0);
    let mut path = parent.to_vec();
    path.extend([number as i32, *index]);
    *index += 1;
    path
}

/// One field as it appears on the wire
struct RawField<'a> {
    number: u32,
    wire_type: WireType,
    /// Key and value bytes, for copying the field unchanged
    encoded: &'a [u8],
    /// Payload of a length-delimited value, empty otherwise
    contents: &'a [u8],
}

fn next_field<'a>(rest: &mut &'a [u8]) -> Result<RawField<'a>> {
    let start: &'a [u8] = *rest;
    let (number, wire_type) = decode_key(rest).map_err(malformed)?;

    let contents: &'a [u8] = if wire_type == WireType::LengthDelimited {
        let len = decode_varint(rest).map_err(malformed)?;
        take(rest, len)?
    } else {
        skip_value(rest, number, wire_type)?;
        &[]
    };

    let consumed = start.len() - rest.len();
    Ok(RawField {
        number,
        wire_type,
        encoded: &start[..consumed],
        contents,
    })
}

fn skip_value(rest: &mut &[u8], number: u32, wire_type: WireType) -> Result<()> {
    match wire_type {
        WireType::Varint => {
            decode_varint(rest).map_err(malformed)?;
        }
        WireType::SixtyFourBit => {
            take(rest, 8)?;
        }
        WireType::ThirtyTwoBit => {
            take(rest, 4)?;
        }
        WireType::LengthDelimited => {
            let len = decode_varint(rest).map_err(malformed)?;
            take(rest, len)?;
        }
        WireType::StartGroup => loop {
            let (inner, inner_type) = decode_key(rest).map_err(malformed)?;
            if inner_type == WireType::EndGroup {
                if inner != number {
                    return Err(GeneratorError::Parse(format!(
                        "Malformed descriptor: group {} closed by {}",
                        number, inner
                    )));
                }
                break;
            }
            skip_value(rest, inner, inner_type)?;
        },
        WireType::EndGroup => {
            return Err(GeneratorError::Parse(format!(
                "Malformed descriptor: unexpected end of group {}",
                number
            )))
        }
    }
    Ok(())
}

fn take<'a>(rest: &mut &'a [u8], len: u64) -> Result<&'a [u8]> {
    let bytes: &'a [u8] = *rest;
    let len = usize::try_from(len)
        .ok()
        .filter(|len| *len <= bytes.len())
        .ok_or_else(|| GeneratorError::Parse("Malformed descriptor: truncated value".to_string()))?;

    let (head, tail) = bytes.split_at(len);
    *rest = tail;
    Ok(head)
}

fn malformed(err: prost::DecodeError) -> GeneratorError {
    GeneratorError::Parse(format!("Malformed descriptor: {}", err))
}

fn push_len_delimited(number: u32, payload: &[u8], buf: &mut Vec<u8>) {
    encode_key(number, WireType::LengthDelimited, buf);
    encode_varint(payload.len() as u64, buf);
    buf.extend_from_slice(payload);
}
