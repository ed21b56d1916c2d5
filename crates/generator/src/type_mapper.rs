//! Type mapping from protobuf field kinds to JSON Schema types

use prost_reflect::{EnumDescriptor, Kind, MessageDescriptor};
use protoc_gen_jsonschema_common::JsonType;

/// Messages rendered with a fixed shape instead of a `$ref`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownType {
    Struct,
    Any,
    Empty,
    Timestamp,
}

impl WellKnownType {
    /// Recognize a message by its fully qualified name
    pub fn from_full_name(full_name: &str) -> Option<Self> {
        match full_name {
            "google.protobuf.Struct" => Some(WellKnownType::Struct),
            "google.protobuf.Any" => Some(WellKnownType::Any),
            "google.protobuf.Empty" => Some(WellKnownType::Empty),
            "google.protobuf.Timestamp" => Some(WellKnownType::Timestamp),
            _ => None,
        }
    }
}

/// What a single (non-repeated) field value maps to
#[derive(Debug, Clone)]
pub enum MappedType {
    Scalar {
        json_type: JsonType,
        format: Option<&'static str>,
    },
    Enum(EnumDescriptor),
    WellKnown(WellKnownType),
    Message(MessageDescriptor),
}

/// Maps protobuf kinds to JSON Schema types
pub struct TypeMapper;

impl TypeMapper {
    /// Map a field kind
    pub fn map_kind(kind: Kind) -> MappedType {
        let (json_type, format) = match kind {
            Kind::Bool => (JsonType::Boolean, None),
            Kind::String | Kind::Bytes => (JsonType::String, None),
            Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => (JsonType::Integer, Some("int32")),
            Kind::Uint32 | Kind::Fixed32 => (JsonType::Integer, Some("uint32")),
            Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => (JsonType::Integer, Some("int64")),
            Kind::Uint64 | Kind::Fixed64 => (JsonType::Integer, Some("uint64")),
            Kind::Float => (JsonType::Number, Some("float32")),
            Kind::Double => (JsonType::Number, Some("float64")),
            Kind::Enum(enum_desc) => return MappedType::Enum(enum_desc),
            Kind::Message(message) => {
                return match WellKnownType::from_full_name(message.full_name()) {
                    Some(well_known) => MappedType::WellKnown(well_known),
                    None => MappedType::Message(message),
                }
            }
        };
        MappedType::Scalar { json_type, format }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_scalar_kinds() {
        let cases = [
            (Kind::Bool, JsonType::Boolean, None),
            (Kind::String, JsonType::String, None),
            (Kind::Bytes, JsonType::String, None),
            (Kind::Int32, JsonType::Integer, Some("int32")),
            (Kind::Sint32, JsonType::Integer, Some("int32")),
            (Kind::Sfixed32, JsonType::Integer, Some("int32")),
            (Kind::Uint32, JsonType::Integer, Some("uint32")),
            (Kind::Fixed32, JsonType::Integer, Some("uint32")),
            (Kind::Int64, JsonType::Integer, Some("int64")),
            (Kind::Sint64, JsonType::Integer, Some("int64")),
            (Kind::Sfixed64, JsonType::Integer, Some("int64")),
            (Kind::Uint64, JsonType::Integer, Some("uint64")),
            (Kind::Fixed64, JsonType::Integer, Some("uint64")),
            (Kind::Float, JsonType::Number, Some("float32")),
            (Kind::Double, JsonType::Number, Some("float64")),
        ];

        for (kind, expected_type, expected_format) in cases {
            match TypeMapper::map_kind(kind.clone()) {
                MappedType::Scalar { json_type, format } => {
                    assert_eq!(json_type, expected_type, "type for {:?}", kind);
                    assert_eq!(format, expected_format, "format for {:?}", kind);
                }
                other => panic!("{:?} mapped to {:?}", kind, other),
            }
        }
    }

    #[test]
    fn test_well_known_types() {
        assert_eq!(
            WellKnownType::from_full_name("google.protobuf.Timestamp"),
            Some(WellKnownType::Timestamp)
        );
        assert_eq!(
            WellKnownType::from_full_name("google.protobuf.Any"),
            Some(WellKnownType::Any)
        );
        assert_eq!(
            WellKnownType::from_full_name("google.protobuf.Struct"),
            Some(WellKnownType::Struct)
        );
        assert_eq!(
            WellKnownType::from_full_name("google.protobuf.Empty"),
            Some(WellKnownType::Empty)
        );
        assert_eq!(WellKnownType::from_full_name("google.protobuf.Duration"), None);
        assert_eq!(WellKnownType::from_full_name("shop.Timestamp"), None);
    }
}
