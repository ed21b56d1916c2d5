//! Leading documentation comments
//!
//! protoc only attaches `source_code_info` to the files it was asked to
//! generate, so descriptors from imported files have no comments.

use prost_reflect::{FieldDescriptor, FileDescriptor, MessageDescriptor};
use regex::Regex;
use std::sync::LazyLock;

/// API linter directives such as `(-- api-linter: core::0140=disabled --)`
static LINTER_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(-- .* --\)").expect("linter directive pattern is valid"));

/// Normalize a raw comment into a one-line description
///
/// Newlines are removed, linter directives stripped, and the result trimmed.
///
/// # Examples
/// ```
/// use protoc_gen_jsonschema_parser::reformat_comment;
///
/// assert_eq!(reformat_comment(" A user.\n Has a name.\n"), "A user. Has a name.");
/// assert_eq!(reformat_comment(" Id (-- api-linter: x=disabled --)\n"), "Id");
/// ```
pub fn reformat_comment(comment: &str) -> String {
    let collapsed = comment.replace(['\n', '\r'], "");
    LINTER_DIRECTIVE
        .replace_all(&collapsed, "")
        .trim()
        .to_string()
}

/// Normalized leading comment of a message, `None` when absent or blank
pub fn message_description(message: &MessageDescriptor) -> Option<String> {
    leading_comment(&message.parent_file(), message.path())
}

/// Normalized leading comment of a field, `None` when absent or blank
pub fn field_description(field: &FieldDescriptor) -> Option<String> {
    leading_comment(&field.parent_message().parent_file(), field.path())
}

fn leading_comment(file: &FileDescriptor, path: &[i32]) -> Option<String> {
    let info = file.file_descriptor_proto().source_code_info.as_ref()?;
    let location = info.location.iter().find(|location| location.path == path)?;
    let comment = reformat_comment(location.leading_comments.as_deref()?);
    (!comment.is_empty()).then_some(comment)
}
