//! Synthetic well-known dependency descriptors
//!
//! The descriptor pool used by the renderer resolves every referenced file by
//! name, so the three externals this format relies on are synthesized here:
//! `google/protobuf/empty.proto` (default request/response type),
//! `google/api/annotations.proto` (declares the `http` extension on
//! `MethodOptions`, so it must depend on descriptor.proto), and a minimal
//! `google/protobuf/descriptor.proto` that defines the extended
//! `MethodOptions` with its extension range. They must precede the rendered
//! file in the descriptor set; the pool requires dependencies to be listed
//! before their dependents.

use crate::proto::{FileDescriptorProto, HTTP_EXTENSION_NUMBER};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{descriptor_proto, DescriptorProto, FieldDescriptorProto, OneofDescriptorProto};

fn field(
    name: &str,
    number: i32,
    label: Label,
    r#type: Type,
    type_name: Option<&str>,
) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(r#type as i32),
        type_name: type_name.map(str::to_string),
        ..Default::default()
    }
}

fn pattern_field(
    name: &str,
    number: i32,
    r#type: Type,
    type_name: Option<&str>,
) -> FieldDescriptorProto {
    FieldDescriptorProto {
        oneof_index: Some(0),
        ..field(name, number, Label::Optional, r#type, type_name)
    }
}

/// `google/protobuf/descriptor.proto`, reduced to the `MethodOptions`
/// message that `annotations.proto` extends.
pub fn descriptor_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("google/protobuf/descriptor.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("MethodOptions".to_string()),
            extension_range: vec![descriptor_proto::ExtensionRange {
                start: Some(1000),
                end: Some(536_870_912),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// `google/protobuf/empty.proto`
pub fn empty_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("google/protobuf/empty.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("Empty".to_string()),
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// `google/api/annotations.proto` with the HTTP rule messages folded in and
/// the `http` extension on `.google.protobuf.MethodOptions` constructed by
/// hand. A reflection-derived descriptor would carry the wrong file name and
/// miss the dependency on descriptor.proto, so the whole file is synthesized.
pub fn annotations_file() -> FileDescriptorProto {
    let http = DescriptorProto {
        name: Some("Http".to_string()),
        field: vec![
            field(
                "rules",
                1,
                Label::Repeated,
                Type::Message,
                Some(".google.api.HttpRule"),
            ),
            field(
                "fully_decode_reserved_expansion",
                2,
                Label::Optional,
                Type::Bool,
                None,
            ),
        ],
        ..Default::default()
    };

    let http_rule = DescriptorProto {
        name: Some("HttpRule".to_string()),
        field: vec![
            field("selector", 1, Label::Optional, Type::String, None),
            pattern_field("get", 2, Type::String, None),
            pattern_field("put", 3, Type::String, None),
            pattern_field("post", 4, Type::String, None),
            pattern_field("delete", 5, Type::String, None),
            pattern_field("patch", 6, Type::String, None),
            pattern_field("custom", 8, Type::Message, Some(".google.api.CustomHttpPattern")),
            field("body", 7, Label::Optional, Type::String, None),
            field(
                "additional_bindings",
                11,
                Label::Repeated,
                Type::Message,
                Some(".google.api.HttpRule"),
            ),
            field("response_body", 12, Label::Optional, Type::String, None),
        ],
        oneof_decl: vec![OneofDescriptorProto {
            name: Some("pattern".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    };

    let custom_http_pattern = DescriptorProto {
        name: Some("CustomHttpPattern".to_string()),
        field: vec![
            field("kind", 1, Label::Optional, Type::String, None),
            field("path", 2, Label::Optional, Type::String, None),
        ],
        ..Default::default()
    };

    let http_extension = FieldDescriptorProto {
        extendee: Some(".google.protobuf.MethodOptions".to_string()),
        ..field(
            "http",
            HTTP_EXTENSION_NUMBER,
            Label::Optional,
            Type::Message,
            Some(".google.api.HttpRule"),
        )
    };

    FileDescriptorProto {
        name: Some("google/api/annotations.proto".to_string()),
        package: Some("google.api".to_string()),
        dependency: vec!["google/protobuf/descriptor.proto".to_string()],
        message_type: vec![http, http_rule, custom_http_pattern],
        extension: vec![http_extension],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// All synthetic dependency files, ordered so that each file precedes its
/// dependents.
pub fn well_known_dependencies() -> Vec<FileDescriptorProto> {
    vec![descriptor_file(), empty_file(), annotations_file()]
}
