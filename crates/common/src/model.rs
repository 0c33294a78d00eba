//! Surface model intermediate representation
//!
//! An API-framework-agnostic view of the types, fields and RPC-like methods
//! of an OpenAPI description. The parser produces it; the generator consumes
//! it and never mutates it (parameter flattening yields new field values).

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};

/// The shape of a surface field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Scalar,
    Array,
    Reference,
    Map,
}

/// Where a field travels in an HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldPosition {
    None,
    Body,
    Query,
    Path,
}

/// A single field of a surface type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,

    /// The surface type string: an OpenAPI scalar name ("string", "integer"),
    /// a referenced component name ("Shelf"), or a map encoding
    /// ("map[string]int32").
    pub field_type: String,

    /// Optional format refinement (e.g. "int64" for an integer)
    #[serde(default)]
    pub format: String,

    pub kind: FieldKind,

    pub position: FieldPosition,
}

impl FieldDefinition {
    /// Whether the surface type denotes a protobuf map
    pub fn is_map(&self) -> bool {
        self.kind == FieldKind::Map || self.field_type.starts_with("map[")
    }
}

/// A named type of the surface model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Marks types that hold the parameters of an RPC method. Path and query
    /// fields of such types are subject to gRPC-HTTP transcoding constraints.
    #[serde(default)]
    pub request_parameters: bool,

    pub fields: Vec<FieldDefinition>,
}

/// An RPC-like method derived from an OpenAPI operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub name: String,

    /// The HTTP path template, e.g. "/shelves/{shelf}"
    pub path: String,

    /// The HTTP verb in upper case, e.g. "GET"
    pub http_method: String,

    /// Name of the request-parameter container type; empty when the method
    /// takes no parameters.
    #[serde(default)]
    pub parameters_type_name: String,

    /// Name of the response container type; empty when the method returns
    /// nothing.
    #[serde(default)]
    pub responses_type_name: String,
}

/// The complete surface model of one OpenAPI description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceModel {
    pub types: Vec<TypeDefinition>,
    pub methods: Vec<MethodDefinition>,

    /// URLs of external OpenAPI descriptions referenced from this one,
    /// possibly with fragments and duplicates; the generator deduplicates.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl SurfaceModel {
    /// Look up a type by its short name.
    ///
    /// Returns `None` when there is no match and fails when the name is
    /// ambiguous across merged documents.
    pub fn type_by_name(&self, name: &str) -> Result<Option<&TypeDefinition>> {
        let mut matches = self.types.iter().filter(|t| t.name == name);
        let first = matches.next();
        if matches.next().is_some() {
            return Err(GeneratorError::AmbiguousTypeReference(name.to_string()));
        }
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_field(name: &str) -> FieldDefinition {
        FieldDefinition {
            name: name.to_string(),
            field_type: "string".to_string(),
            format: String::new(),
            kind: FieldKind::Scalar,
            position: FieldPosition::None,
        }
    }

    #[test]
    fn test_type_by_name() {
        let model = SurfaceModel {
            types: vec![
                TypeDefinition {
                    name: "Shelf".to_string(),
                    description: String::new(),
                    request_parameters: false,
                    fields: vec![scalar_field("name")],
                },
                TypeDefinition {
                    name: "Book".to_string(),
                    description: String::new(),
                    request_parameters: false,
                    fields: vec![scalar_field("title")],
                },
            ],
            methods: vec![],
            dependencies: vec![],
        };

        assert_eq!(model.type_by_name("Shelf").unwrap().unwrap().name, "Shelf");
        assert!(model.type_by_name("Missing").unwrap().is_none());
    }

    #[test]
    fn test_type_by_name_ambiguous() {
        let duplicate = TypeDefinition {
            name: "Pet".to_string(),
            description: String::new(),
            request_parameters: false,
            fields: vec![],
        };
        let model = SurfaceModel {
            types: vec![duplicate.clone(), duplicate],
            methods: vec![],
            dependencies: vec![],
        };

        assert!(matches!(
            model.type_by_name("Pet"),
            Err(GeneratorError::AmbiguousTypeReference(_))
        ));
    }

    #[test]
    fn test_is_map() {
        let field = FieldDefinition {
            name: "attributes".to_string(),
            field_type: "map[string]int32".to_string(),
            format: String::new(),
            kind: FieldKind::Map,
            position: FieldPosition::None,
        };
        assert!(field.is_map());
        assert!(!scalar_field("name").is_map());
    }
}
