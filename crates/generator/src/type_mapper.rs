//! Type mapping from surface fields to protobuf descriptor types
//!
//! Maps the surface model's scalar/array/reference/map field shapes to the
//! protobuf field descriptor type, label, and type name.

use openapi_grpc_transcoder_common::{
    capitalize, FieldDefinition, FieldKind, GeneratorError, Result,
};
use prost_types::field_descriptor_proto::{Label, Type};
use std::collections::HashMap;

/// Maps surface field shapes to protobuf descriptor types
pub struct TypeMapper;

impl TypeMapper {
    /// The protobuf scalar type for an explicit scalar name, e.g. "int64".
    pub fn scalar_type(name: &str) -> Option<Type> {
        match name {
            "double" => Some(Type::Double),
            "float" => Some(Type::Float),
            "int64" => Some(Type::Int64),
            "uint64" => Some(Type::Uint64),
            "int32" => Some(Type::Int32),
            "fixed64" => Some(Type::Fixed64),
            "fixed32" => Some(Type::Fixed32),
            "bool" => Some(Type::Bool),
            "string" => Some(Type::String),
            "bytes" => Some(Type::Bytes),
            "uint32" => Some(Type::Uint32),
            "sfixed32" => Some(Type::Sfixed32),
            "sfixed64" => Some(Type::Sfixed64),
            "sint32" => Some(Type::Sint32),
            "sint64" => Some(Type::Sint64),
            _ => None,
        }
    }

    /// The protobuf type for an OpenAPI data type name.
    fn openapi_type(name: &str) -> Option<Type> {
        match name {
            "string" => Some(Type::String),
            "integer" => Some(Type::Int32),
            "number" => Some(Type::Float),
            "boolean" => Some(Type::Bool),
            "object" => Some(Type::Message),
            // "array" is absent: the element could be scalar or not.
            _ => None,
        }
    }

    /// Whether `name` is one of the scalar OpenAPI data types.
    pub fn is_openapi_scalar(name: &str) -> bool {
        matches!(name, "string" | "integer" | "number" | "boolean")
    }

    /// Map a surface field to its protobuf descriptor type.
    ///
    /// Lookup order: explicit format, explicit type string, OpenAPI type
    /// name, and finally MESSAGE for references, arrays of non-scalar
    /// elements, and maps. A field that matches none of these has no
    /// protobuf representation and is a fatal error.
    pub fn proto_type(field: &FieldDefinition) -> Result<Type> {
        if let Some(t) = Self::scalar_type(&field.format) {
            return Ok(t);
        }
        if let Some(t) = Self::scalar_type(&field.field_type) {
            return Ok(t);
        }
        if let Some(t) = Self::openapi_type(&field.field_type) {
            return Ok(t);
        }
        if field.kind == FieldKind::Reference
            || (field.kind == FieldKind::Array && !Self::is_openapi_scalar(&field.field_type))
            || field.is_map()
        {
            return Ok(Type::Message);
        }
        Err(GeneratorError::UnmappableType {
            field: field.name.clone(),
            field_type: field.field_type.clone(),
            format: field.format.clone(),
        })
    }

    /// The descriptor label: repeated for arrays and maps, optional
    /// otherwise (proto3 has no required label).
    pub fn label(field: &FieldDefinition) -> Label {
        if field.kind == FieldKind::Array || field.is_map() {
            Label::Repeated
        } else {
            Label::Optional
        }
    }

    /// The descriptor field name: lowercased, with numeric HTTP-status names
    /// replaced since bare digits are not valid identifiers in .proto.
    pub fn field_name(field: &FieldDefinition) -> String {
        match field.name.to_lowercase().as_str() {
            "200" => "ok".to_string(),
            "400" => "badRequest".to_string(),
            name => name.to_string(),
        }
    }

    /// The package-qualified type name for MESSAGE-typed fields, preferring
    /// a name already registered by an earlier (possibly external) document.
    /// `None` for scalar fields.
    pub fn type_name(
        field: &FieldDefinition,
        package: &str,
        registry: &HashMap<String, String>,
    ) -> Option<String> {
        if field.kind == FieldKind::Reference
            || (field.kind == FieldKind::Array && !Self::is_openapi_scalar(&field.field_type))
        {
            let short = capitalize(&field.field_type);
            let qualified = registry
                .get(&short)
                .cloned()
                .unwrap_or_else(|| format!("{package}.{short}"));
            return Some(qualified);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openapi_grpc_transcoder_common::FieldPosition;

    fn surface_field(field_type: &str, format: &str, kind: FieldKind) -> FieldDefinition {
        FieldDefinition {
            name: "f".to_string(),
            field_type: field_type.to_string(),
            format: format.to_string(),
            kind,
            position: FieldPosition::None,
        }
    }

    #[test]
    fn test_scalar_format_wins() {
        let field = surface_field("integer", "int64", FieldKind::Scalar);
        assert_eq!(TypeMapper::proto_type(&field).unwrap(), Type::Int64);
        assert_eq!(TypeMapper::label(&field), Label::Optional);
    }

    #[test]
    fn test_openapi_type_table() {
        let field = surface_field("number", "", FieldKind::Scalar);
        assert_eq!(TypeMapper::proto_type(&field).unwrap(), Type::Float);

        let field = surface_field("boolean", "", FieldKind::Scalar);
        assert_eq!(TypeMapper::proto_type(&field).unwrap(), Type::Bool);
    }

    #[test]
    fn test_array_of_non_scalar_is_message() {
        let field = surface_field("Shelf", "", FieldKind::Array);
        assert_eq!(TypeMapper::proto_type(&field).unwrap(), Type::Message);
        assert_eq!(TypeMapper::label(&field), Label::Repeated);
    }

    #[test]
    fn test_array_of_scalar_keeps_scalar_type() {
        let field = surface_field("string", "", FieldKind::Array);
        assert_eq!(TypeMapper::proto_type(&field).unwrap(), Type::String);
        assert_eq!(TypeMapper::label(&field), Label::Repeated);
    }

    #[test]
    fn test_unmappable_type_is_fatal() {
        let field = surface_field("whatever", "", FieldKind::Scalar);
        assert!(matches!(
            TypeMapper::proto_type(&field),
            Err(GeneratorError::UnmappableType { .. })
        ));
    }

    #[test]
    fn test_field_name_special_cases() {
        let mut field = surface_field("string", "", FieldKind::Scalar);
        field.name = "200".to_string();
        assert_eq!(TypeMapper::field_name(&field), "ok");
        field.name = "400".to_string();
        assert_eq!(TypeMapper::field_name(&field), "badRequest");
        field.name = "Title".to_string();
        assert_eq!(TypeMapper::field_name(&field), "title");
    }

    #[test]
    fn test_type_name_prefers_registry() {
        let field = surface_field("pet", "", FieldKind::Reference);

        let empty = HashMap::new();
        assert_eq!(
            TypeMapper::type_name(&field, "bookstore", &empty),
            Some("bookstore.Pet".to_string())
        );

        let mut registry = HashMap::new();
        registry.insert("Pet".to_string(), "pets.Pet".to_string());
        assert_eq!(
            TypeMapper::type_name(&field, "bookstore", &registry),
            Some("pets.Pet".to_string())
        );
    }

    #[test]
    fn test_scalar_has_no_type_name() {
        let field = surface_field("string", "", FieldKind::Scalar);
        assert_eq!(TypeMapper::type_name(&field, "bookstore", &HashMap::new()), None);
    }
}
