//! Integration tests for schema derivation
//!
//! Annotations come from a mocked resolver so each test can attach exactly
//! the options it needs.

use mockall::mock;
use prost_reflect::{DescriptorPool, FieldDescriptor, MessageDescriptor};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FieldDescriptorProto};
use protoc_gen_jsonschema_common::{EnumType, GeneratorConfig, SchemaDocument};
use protoc_gen_jsonschema_generator::SchemaBuilder;
use protoc_gen_jsonschema_parser::testing::{self, TestFile, TestMessage};
use protoc_gen_jsonschema_parser::{
    AnnotationResolver, FieldAnnotations, MessageAnnotations, NoAnnotations,
};
use serde_json::{json, Value};
use std::collections::HashMap;

mock! {
    pub Resolver {}

    impl AnnotationResolver for Resolver {
        fn field_annotations(&self, field: &FieldDescriptor) -> Option<FieldAnnotations>;
        fn message_annotations(&self, message: &MessageDescriptor) -> Option<MessageAnnotations>;
    }
}

/// Resolver answering from tables keyed by full name
fn resolver(
    fields: &[(&str, FieldAnnotations)],
    messages: &[(&str, MessageAnnotations)],
) -> MockResolver {
    let fields: HashMap<String, FieldAnnotations> = fields
        .iter()
        .map(|(name, annotations)| (name.to_string(), annotations.clone()))
        .collect();
    let messages: HashMap<String, MessageAnnotations> = messages
        .iter()
        .map(|(name, annotations)| (name.to_string(), annotations.clone()))
        .collect();

    let mut resolver = MockResolver::new();
    resolver
        .expect_field_annotations()
        .returning(move |field| fields.get(field.full_name()).cloned());
    resolver
        .expect_message_annotations()
        .returning(move |message| messages.get(message.full_name()).cloned());
    resolver
}

fn pool(file: TestFile) -> DescriptorPool {
    let bytes = testing::encode_file_descriptor_set(&testing::with_dependencies(file));
    DescriptorPool::decode(bytes.as_slice()).unwrap()
}

fn message(pool: &DescriptorPool, name: &str) -> MessageDescriptor {
    pool.get_message_by_name(name)
        .unwrap_or_else(|| panic!("message {} not in pool", name))
}

fn build<R: AnnotationResolver>(
    pool: &DescriptorPool,
    name: &str,
    config: GeneratorConfig,
    resolver: &R,
) -> SchemaDocument {
    SchemaBuilder::new(config, resolver)
        .build(&message(pool, name))
        .expect("message should produce a document")
}

fn to_json(document: &SchemaDocument) -> Value {
    serde_json::to_value(document).unwrap()
}

fn inlining_disabled() -> GeneratorConfig {
    GeneratorConfig {
        repeated_defs: false,
        ..Default::default()
    }
}

/// A(b: B), B(c: C, label: string), C(value: double)
fn chain_file() -> TestFile {
    TestFile::new("chain.proto", "chain")
        .message(TestMessage::new("A").field(testing::message_field("b", 1, ".chain.B")))
        .message(
            TestMessage::new("B")
                .field(testing::message_field("c", 1, ".chain.C"))
                .field(testing::field("label", 2, Type::String)),
        )
        .message(TestMessage::new("C").field(testing::field("value", 1, Type::Double)))
        .comment(testing::message_path(1), " The B message.\n")
}

#[test]
fn test_scalar_type_table() {
    let kinds = [
        ("flag", Type::Bool, json!({ "type": "boolean" })),
        ("text", Type::String, json!({ "type": "string" })),
        ("blob", Type::Bytes, json!({ "type": "string" })),
        ("i32", Type::Int32, json!({ "type": "integer", "format": "int32" })),
        ("s32", Type::Sint32, json!({ "type": "integer", "format": "int32" })),
        ("sf32", Type::Sfixed32, json!({ "type": "integer", "format": "int32" })),
        ("u32", Type::Uint32, json!({ "type": "integer", "format": "uint32" })),
        ("f32", Type::Fixed32, json!({ "type": "integer", "format": "uint32" })),
        ("i64", Type::Int64, json!({ "type": "integer", "format": "int64" })),
        ("s64", Type::Sint64, json!({ "type": "integer", "format": "int64" })),
        ("sf64", Type::Sfixed64, json!({ "type": "integer", "format": "int64" })),
        ("u64", Type::Uint64, json!({ "type": "integer", "format": "uint64" })),
        ("f64", Type::Fixed64, json!({ "type": "integer", "format": "uint64" })),
        ("single", Type::Float, json!({ "type": "number", "format": "float32" })),
        ("double", Type::Double, json!({ "type": "number", "format": "float64" })),
    ];

    let mut scalars = TestMessage::new("Scalars");
    for (number, (name, ty, _)) in kinds.iter().enumerate() {
        scalars = scalars.field(testing::field(name, number as i32 + 1, *ty));
    }
    let pool = pool(TestFile::new("scalars.proto", "types").message(scalars));

    let doc = to_json(&build(&pool, "types.Scalars", GeneratorConfig::default(), &NoAnnotations));
    for (name, _, expected) in &kinds {
        assert_eq!(&doc["properties"][name], expected, "field {}", name);
    }
    assert_eq!(doc["properties"].as_object().unwrap().len(), kinds.len());
    assert!(doc.get("required").is_none());
    assert!(doc.get("definitions").is_none());
}

#[test]
fn test_user_scenario() {
    let pool = pool(
        TestFile::new("user.proto", "shop").message(
            TestMessage::new("User")
                .field(testing::field("name", 1, Type::String))
                .field(testing::field("age", 2, Type::Int32))
                .field(testing::repeated("tags", 3, Type::String)),
        ),
    );
    let resolver = resolver(
        &[
            (
                "shop.User.name",
                FieldAnnotations {
                    required: true,
                    ..Default::default()
                },
            ),
            (
                "shop.User.tags",
                FieldAnnotations {
                    min_items: 1,
                    ..Default::default()
                },
            ),
        ],
        &[],
    );

    let doc = build(&pool, "shop.User", GeneratorConfig::default(), &resolver);
    assert_eq!(
        to_json(&doc),
        json!({
            "$id": "User.json",
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "User",
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "age": { "type": "integer", "format": "int32" },
                "tags": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 1
                }
            },
            "required": ["name"]
        })
    );
}

#[test]
fn test_ignored_field_is_absent_everywhere() {
    let pool = pool(
        TestFile::new("user.proto", "shop").message(
            TestMessage::new("User")
                .field(testing::field("name", 1, Type::String))
                .field(testing::field("password", 2, Type::String)),
        ),
    );
    let resolver = resolver(
        &[(
            "shop.User.password",
            FieldAnnotations {
                ignore: true,
                required: true,
                ..Default::default()
            },
        )],
        &[],
    );

    let doc = build(&pool, "shop.User", GeneratorConfig::default(), &resolver);
    assert!(!doc.properties.contains_key("password"));
    assert!(doc.required.is_empty());
    assert_eq!(doc.properties.len(), 1);
}

#[test]
fn test_all_fields_required_overrides_field_flags() {
    let pool = pool(
        TestFile::new("user.proto", "shop").message(
            TestMessage::new("Account")
                .field(testing::field("display_name", 1, Type::String))
                .field(testing::field("email", 2, Type::String))
                .field(testing::field("internal_note", 3, Type::String)),
        ),
    );
    let resolver = resolver(
        &[
            (
                "shop.Account.email",
                FieldAnnotations {
                    required: true,
                    ..Default::default()
                },
            ),
            (
                "shop.Account.internal_note",
                FieldAnnotations {
                    ignore: true,
                    ..Default::default()
                },
            ),
        ],
        &[(
            "shop.Account",
            MessageAnnotations {
                all_fields_required: true,
                ..Default::default()
            },
        )],
    );

    let doc = build(&pool, "shop.Account", GeneratorConfig::default(), &resolver);
    assert_eq!(doc.required, vec!["displayName", "email", "internalNote"]);
    assert!(!doc.properties.contains_key("internalNote"));
}

#[test]
fn test_ref_annotation_produces_pure_reference() {
    let pool = pool(
        TestFile::new("order.proto", "shop")
            .message(
                TestMessage::new("Order")
                    .field(testing::repeated_message("totals", 1, ".shop.Money"))
                    .field(testing::field("note", 2, Type::String)),
            )
            .message(TestMessage::new("Money").field(testing::field("units", 1, Type::Int64)))
            .comment(testing::field_path(0, 0), " Totals per currency.\n"),
    );
    let resolver = resolver(
        &[
            (
                "shop.Order.totals",
                FieldAnnotations {
                    r#ref: "money.json#/definitions/Money".to_string(),
                    required: true,
                    min_items: 3,
                    ..Default::default()
                },
            ),
            (
                "shop.Order.note",
                FieldAnnotations {
                    r#ref: "common.json#/definitions/Note".to_string(),
                    ..Default::default()
                },
            ),
        ],
        &[],
    );

    let doc = build(&pool, "shop.Order", GeneratorConfig::default(), &resolver);
    let value = to_json(&doc);
    assert_eq!(
        value["properties"]["totals"],
        json!({ "$ref": "money.json#/definitions/Money" })
    );
    assert_eq!(
        value["properties"]["note"],
        json!({ "$ref": "common.json#/definitions/Note" })
    );
    assert_eq!(doc.required, vec!["totals"]);
    assert!(doc.definitions.is_empty());
}

#[test]
fn test_enum_rendering_modes() {
    let pool = pool(
        TestFile::new("paint.proto", "paint")
            .enumeration(testing::enumeration(
                "Color",
                &[("COLOR_UNSPECIFIED", 0), ("RED", 1), ("GREEN", 5)],
            ))
            .message(
                TestMessage::new("Paint")
                    .field(testing::enum_field("color", 1, ".paint.Color"))
                    .field(FieldDescriptorProto {
                        label: Some(Label::Repeated as i32),
                        ..testing::enum_field("palette", 2, ".paint.Color")
                    }),
            ),
    );

    let doc = to_json(&build(&pool, "paint.Paint", GeneratorConfig::default(), &NoAnnotations));
    assert_eq!(
        doc["properties"]["color"],
        json!({ "type": "string", "enum": ["COLOR_UNSPECIFIED", "RED", "GREEN"] })
    );
    assert_eq!(
        doc["properties"]["palette"]["items"],
        json!({ "type": "string", "enum": ["COLOR_UNSPECIFIED", "RED", "GREEN"] })
    );

    let config = GeneratorConfig {
        enum_type: EnumType::Integer,
        ..Default::default()
    };
    let doc = to_json(&build(&pool, "paint.Paint", config, &NoAnnotations));
    assert_eq!(
        doc["properties"]["color"],
        json!({ "type": "integer", "format": "int32", "enum": [0, 1, 5] })
    );
}

#[test]
fn test_map_fields_are_plain_objects() {
    let pool = pool(
        TestFile::new("labels.proto", "infra").message(
            TestMessage::new("Resource")
                .field(testing::repeated_message(
                    "labels",
                    1,
                    ".infra.Resource.LabelsEntry",
                ))
                .nested(testing::map_entry("LabelsEntry", Type::String, Type::String)),
        ),
    );

    let doc = to_json(&build(&pool, "infra.Resource", GeneratorConfig::default(), &NoAnnotations));
    assert_eq!(doc["properties"]["labels"], json!({ "type": "object" }));
    assert!(doc.get("definitions").is_none());
}

#[test]
fn test_well_known_types() {
    let pool = pool(
        TestFile::new("event.proto", "events").message(
            TestMessage::new("Event")
                .field(testing::message_field(
                    "created_at",
                    1,
                    ".google.protobuf.Timestamp",
                ))
                .field(testing::message_field("payload", 2, ".google.protobuf.Any"))
                .field(testing::message_field("attributes", 3, ".google.protobuf.Struct"))
                .field(testing::message_field("nothing", 4, ".google.protobuf.Empty"))
                .field(testing::repeated_message(
                    "history",
                    5,
                    ".google.protobuf.Timestamp",
                )),
        ),
    );

    let doc = to_json(&build(&pool, "events.Event", GeneratorConfig::default(), &NoAnnotations));
    let properties = doc["properties"].as_object().unwrap();

    assert_eq!(
        properties["createdAt"],
        json!({ "type": "string", "format": "date-time" })
    );
    assert_eq!(
        properties["payload"],
        json!({
            "type": "object",
            "properties": {
                "@type": { "type": "string" },
                "value": { "type": "string" }
            },
            "required": ["@type", "value"]
        })
    );
    assert_eq!(properties["attributes"], json!({ "type": "object" }));
    assert!(!properties.contains_key("nothing"));
    assert_eq!(
        properties["history"],
        json!({ "type": "array", "items": { "type": "string", "format": "date-time" } })
    );
    assert!(doc.get("definitions").is_none());
}

#[test]
fn test_referenced_message_is_inlined() {
    let pool = pool(chain_file());
    let doc = build(&pool, "chain.B", GeneratorConfig::default(), &NoAnnotations);
    let value = to_json(&doc);

    assert_eq!(value["properties"]["c"], json!({ "$ref": "#/definitions/C" }));
    assert_eq!(
        value["definitions"]["C"],
        json!({
            "type": "object",
            "properties": { "value": { "type": "number", "format": "float64" } }
        })
    );
    assert_eq!(value["description"], json!("The B message."));
}

#[test]
fn test_nested_definitions_are_flattened() {
    let pool = pool(chain_file());
    let doc = build(&pool, "chain.A", GeneratorConfig::default(), &NoAnnotations);

    let names: Vec<&str> = doc.definitions.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["C", "B"]);
    assert!(doc.definitions.values().all(|d| d.definitions.is_empty()));

    let b = &doc.definitions["B"];
    assert_eq!(b.description.as_deref(), Some("The B message."));
    assert!(b.id.is_none());
    assert!(b.title.is_none());
    assert!(b.schema_dialect.is_none());
    assert_eq!(
        to_json(b)["properties"]["c"],
        json!({ "$ref": "#/definitions/C" })
    );
}

#[test]
fn test_inlining_toggle_only_changes_references() {
    let pool = pool(chain_file());
    let inlined = build(&pool, "chain.A", GeneratorConfig::default(), &NoAnnotations);
    let external = build(&pool, "chain.A", inlining_disabled(), &NoAnnotations);

    assert_eq!(
        to_json(&inlined)["properties"]["b"],
        json!({ "$ref": "#/definitions/B" })
    );
    assert_eq!(
        to_json(&external)["properties"]["b"],
        json!({ "$ref": "B.json" })
    );
    assert!(external.definitions.is_empty());
    assert!(!inlined.definitions.is_empty());

    let inlined_keys: Vec<&String> = inlined.properties.keys().collect();
    let external_keys: Vec<&String> = external.properties.keys().collect();
    assert_eq!(inlined_keys, external_keys);
    assert_eq!(inlined.required, external.required);
}

#[test]
fn test_cyclic_references_terminate() {
    let pool = pool(
        TestFile::new("catalog.proto", "catalog")
            .message(
                TestMessage::new("Product")
                    .field(testing::field("name", 1, Type::String))
                    .field(testing::message_field("price", 2, ".catalog.Price"))
                    .field(testing::repeated_message("reviews", 3, ".catalog.Review")),
            )
            .message(
                TestMessage::new("Price")
                    .field(testing::field("amount", 1, Type::Double))
                    .field(testing::message_field("currency", 2, ".catalog.Currency")),
            )
            .message(TestMessage::new("Currency").field(testing::field("code", 1, Type::String)))
            .message(
                TestMessage::new("Review")
                    .field(testing::field("text", 1, Type::String))
                    .field(testing::message_field("product", 2, ".catalog.Product")),
            ),
    );

    let doc = build(&pool, "catalog.Product", GeneratorConfig::default(), &NoAnnotations);
    let names: Vec<&str> = doc.definitions.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Currency", "Price", "Product", "Review"]);

    let value = to_json(&doc);
    assert_eq!(
        value["properties"]["reviews"],
        json!({ "type": "array", "items": { "$ref": "#/definitions/Review" } })
    );
    assert_eq!(
        value["definitions"]["Review"]["properties"]["product"],
        json!({ "$ref": "#/definitions/Product" })
    );
    assert_eq!(
        value["definitions"]["Product"]["properties"]["reviews"]["items"],
        json!({ "$ref": "#/definitions/Review" })
    );
}

#[test]
fn test_self_reference_gets_one_definition() {
    let pool = pool(
        TestFile::new("tree.proto", "tree").message(
            TestMessage::new("Node")
                .field(testing::field("value", 1, Type::String))
                .field(testing::repeated_message("children", 2, ".tree.Node")),
        ),
    );

    let doc = build(&pool, "tree.Node", GeneratorConfig::default(), &NoAnnotations);
    assert_eq!(doc.definitions.len(), 1);
    let node = &doc.definitions["Node"];
    assert!(node.definitions.is_empty());
    assert_eq!(
        to_json(node)["properties"]["children"]["items"],
        json!({ "$ref": "#/definitions/Node" })
    );
}

#[test]
fn test_item_descriptions() {
    let pool = pool(
        TestFile::new("blog.proto", "blog")
            .message(
                TestMessage::new("Post")
                    .field(testing::repeated("tags", 1, Type::String))
                    .field(testing::repeated_message("comments", 2, ".blog.Comment"))
                    .field(testing::message_field("author", 3, ".blog.Author")),
            )
            .message(TestMessage::new("Comment").field(testing::field("body", 1, Type::String)))
            .message(TestMessage::new("Author").field(testing::field("name", 1, Type::String)))
            .comment(testing::message_path(0), " A blog post.\n (-- api-linter: x=disabled --)\n")
            .comment(testing::field_path(0, 0), " Free-form tags.\n")
            .comment(testing::field_path(0, 1), " Reader comments.\n")
            .comment(testing::field_path(0, 2), " Who wrote it.\n")
            .comment(testing::message_path(1), " A reader comment.\n"),
    );

    let doc = build(&pool, "blog.Post", GeneratorConfig::default(), &NoAnnotations);
    assert_eq!(doc.description.as_deref(), Some("A blog post."));

    let value = to_json(&doc);
    assert_eq!(
        value["properties"]["tags"],
        json!({
            "type": "array",
            "description": "Free-form tags.",
            "items": { "type": "string", "description": "Free-form tags." }
        })
    );
    assert_eq!(
        value["properties"]["comments"],
        json!({
            "type": "array",
            "description": "Reader comments.",
            "items": { "$ref": "#/definitions/Comment" }
        })
    );
    assert_eq!(
        value["properties"]["author"],
        json!({ "description": "Who wrote it.", "$ref": "#/definitions/Author" })
    );
    assert_eq!(
        value["definitions"]["Comment"]["description"],
        json!("A reader comment.")
    );
}

#[test]
fn test_ignored_message_produces_no_document() {
    let pool = pool(chain_file());
    let resolver = resolver(
        &[],
        &[(
            "chain.C",
            MessageAnnotations {
                ignore: true,
                ..Default::default()
            },
        )],
    );

    let mut builder = SchemaBuilder::new(GeneratorConfig::default(), &resolver);
    assert!(builder.build(&message(&pool, "chain.C")).is_none());

    // Referencing an ignored message keeps the $ref but inlines nothing
    let doc = builder.build(&message(&pool, "chain.B")).unwrap();
    assert!(doc.properties.contains_key("c"));
    assert!(doc.definitions.is_empty());
}

#[test]
fn test_id_override() {
    let pool = pool(chain_file());
    let resolver = resolver(
        &[],
        &[
            (
                "chain.A",
                MessageAnnotations {
                    id: "https://example.com/schemas/a.json".to_string(),
                    ..Default::default()
                },
            ),
            (
                "chain.B",
                MessageAnnotations {
                    id: "urn:b".to_string(),
                    ..Default::default()
                },
            ),
        ],
    );

    let doc = build(&pool, "chain.A", GeneratorConfig::default(), &resolver);
    assert_eq!(doc.id.as_deref(), Some("https://example.com/schemas/a.json"));
    assert_eq!(doc.title.as_deref(), Some("A"));
    assert_eq!(doc.definitions["B"].id.as_deref(), Some("urn:b"));
}

#[test]
fn test_string_constraints_are_copied() {
    let pool = pool(
        TestFile::new("user.proto", "shop").message(
            TestMessage::new("Signup")
                .field(testing::field("username", 1, Type::String))
                .field(testing::field("created", 2, Type::Int64)),
        ),
    );
    let resolver = resolver(
        &[
            (
                "shop.Signup.username",
                FieldAnnotations {
                    min_length: 3,
                    max_length: 32,
                    pattern: "^[a-z0-9_]+$".to_string(),
                    format: "hostname".to_string(),
                    ..Default::default()
                },
            ),
            (
                "shop.Signup.created",
                FieldAnnotations {
                    format: "unix-time".to_string(),
                    ..Default::default()
                },
            ),
        ],
        &[],
    );

    let value = to_json(&build(&pool, "shop.Signup", GeneratorConfig::default(), &resolver));
    assert_eq!(
        value["properties"]["username"],
        json!({
            "type": "string",
            "format": "hostname",
            "minLength": 3,
            "maxLength": 32,
            "pattern": "^[a-z0-9_]+$"
        })
    );
    assert_eq!(
        value["properties"]["created"],
        json!({ "type": "integer", "format": "int64" })
    );
}

#[test]
fn test_type_format_wins_over_annotation_format() {
    let pool = pool(
        TestFile::new("metrics.proto", "metrics").message(
            TestMessage::new("Reading")
                .field(testing::field("n", 1, Type::Int32))
                .field(testing::message_field("ts", 2, ".google.protobuf.Timestamp"))
                .field(testing::field("source", 3, Type::String)),
        ),
    );
    let custom = FieldAnnotations {
        format: "custom".to_string(),
        ..Default::default()
    };
    let resolver = resolver(
        &[
            ("metrics.Reading.n", custom.clone()),
            ("metrics.Reading.ts", custom.clone()),
            ("metrics.Reading.source", custom),
        ],
        &[],
    );

    let value = to_json(&build(&pool, "metrics.Reading", GeneratorConfig::default(), &resolver));
    assert_eq!(
        value["properties"]["n"],
        json!({ "type": "integer", "format": "int32" })
    );
    assert_eq!(
        value["properties"]["ts"],
        json!({ "type": "string", "format": "date-time" })
    );
    assert_eq!(
        value["properties"]["source"],
        json!({ "type": "string", "format": "custom" })
    );
}

#[test]
fn test_group_fields_are_omitted() {
    let pool = pool(
        TestFile::new("legacy.proto", "legacy")
            .syntax("proto2")
            .message(
                TestMessage::new("Search")
                    .field(testing::field("query", 1, Type::String))
                    .field(FieldDescriptorProto {
                        type_name: Some(".legacy.Search.Result".to_string()),
                        ..testing::field("result", 2, Type::Group)
                    })
                    .nested(DescriptorProto {
                        name: Some("Result".to_string()),
                        field: vec![testing::field("url", 3, Type::String)],
                        ..Default::default()
                    }),
            ),
    );
    let search = message(&pool, "legacy.Search");
    assert!(search.get_field_by_name("result").unwrap().is_group());

    let doc = build(&pool, "legacy.Search", GeneratorConfig::default(), &NoAnnotations);
    let names: Vec<&str> = doc.properties.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["query"]);
    assert!(doc.definitions.is_empty());
}

#[test]
fn test_colliding_definition_names_keep_the_first() {
    let pool = pool(
        TestFile::new("shop.proto", "shop")
            .message(
                TestMessage::new("Order")
                    .field(testing::message_field("item", 1, ".shop.Item"))
                    .field(testing::message_field("gift", 2, ".shop.Order.Item"))
                    .nested(DescriptorProto {
                        name: Some("Item".to_string()),
                        field: vec![testing::field("wrapping", 1, Type::String)],
                        ..Default::default()
                    }),
            )
            .message(TestMessage::new("Item").field(testing::field("sku", 1, Type::String))),
    );

    let doc = build(&pool, "shop.Order", GeneratorConfig::default(), &NoAnnotations);
    let names: Vec<&str> = doc.definitions.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Item"]);

    let value = to_json(&doc);
    assert_eq!(
        value["definitions"]["Item"],
        json!({
            "type": "object",
            "properties": { "sku": { "type": "string" } }
        })
    );
    assert_eq!(value["properties"]["item"], json!({ "$ref": "#/definitions/Item" }));
    assert_eq!(value["properties"]["gift"], json!({ "$ref": "#/definitions/Item" }));
}
