//! gRPC-HTTP transcoding constraints on path and query parameters
//!
//! Path templates may only refer to non-repeated primitive fields, and query
//! parameters must be primitives, repeated primitives, or non-repeated
//! message types (see google/api/http.proto). Validation runs before the
//! type mapper because reference flattening rewrites a field's shape.
//!
//! All functions are pure: they return a new field value and never mutate
//! the caller's surface model, so a referenced type can safely be flattened
//! into several parameter fields.

use crate::type_mapper::TypeMapper;
use openapi_grpc_transcoder_common::{
    FieldDefinition, FieldKind, FieldPosition, GeneratorError, Result, SurfaceModel,
};

/// Validates parameter container fields against transcoding rules
pub struct ParameterValidator;

impl ParameterValidator {
    /// Validate a path-position field.
    ///
    /// Scalars pass as-is. A reference is flattened into the single scalar
    /// path field of its referenced type; everything else is fatal.
    pub fn validate_path_parameter(
        field: &FieldDefinition,
        model: &SurfaceModel,
    ) -> Result<FieldDefinition> {
        match field.kind {
            FieldKind::Scalar => Ok(field.clone()),
            FieldKind::Reference => Self::flatten_path_parameter(field, model),
            _ => Err(GeneratorError::InvalidPathParameter(field.name.clone())),
        }
    }

    /// Validate a query-position field: scalar, array of OpenAPI scalars, or
    /// a non-repeated message reference.
    pub fn validate_query_parameter(field: &FieldDefinition) -> Result<FieldDefinition> {
        let valid = match field.kind {
            FieldKind::Scalar | FieldKind::Reference => true,
            FieldKind::Array => TypeMapper::is_openapi_scalar(&field.field_type),
            FieldKind::Map => false,
        };
        if valid {
            Ok(field.clone())
        } else {
            Err(GeneratorError::InvalidQueryParameter(field.name.clone()))
        }
    }

    /// Replace a reference-typed path parameter with the values of the
    /// single scalar path field of its referenced type.
    fn flatten_path_parameter(
        field: &FieldDefinition,
        model: &SurfaceModel,
    ) -> Result<FieldDefinition> {
        let referenced = model
            .type_by_name(&field.field_type)?
            .ok_or_else(|| GeneratorError::InvalidPathParameter(field.name.clone()))?;

        let single = match referenced.fields.as_slice() {
            [single] => single,
            _ => return Err(GeneratorError::InvalidPathParameter(field.name.clone())),
        };
        if single.position != FieldPosition::Path || single.kind != FieldKind::Scalar {
            return Err(GeneratorError::InvalidPathParameter(field.name.clone()));
        }

        Ok(FieldDefinition {
            name: single.name.clone(),
            field_type: single.field_type.clone(),
            format: single.format.clone(),
            kind: single.kind,
            position: FieldPosition::Path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openapi_grpc_transcoder_common::TypeDefinition;

    fn field(
        name: &str,
        field_type: &str,
        kind: FieldKind,
        position: FieldPosition,
    ) -> FieldDefinition {
        FieldDefinition {
            name: name.to_string(),
            field_type: field_type.to_string(),
            format: String::new(),
            kind,
            position,
        }
    }

    fn model_with(types: Vec<TypeDefinition>) -> SurfaceModel {
        SurfaceModel {
            types,
            methods: vec![],
            dependencies: vec![],
        }
    }

    #[test]
    fn test_scalar_path_parameter_passes() {
        let f = field("shelf", "integer", FieldKind::Scalar, FieldPosition::Path);
        let validated =
            ParameterValidator::validate_path_parameter(&f, &model_with(vec![])).unwrap();
        assert_eq!(validated, f);
    }

    #[test]
    fn test_reference_path_parameter_is_flattened() {
        let model = model_with(vec![TypeDefinition {
            name: "ShelfName".to_string(),
            description: String::new(),
            request_parameters: false,
            fields: vec![FieldDefinition {
                name: "name".to_string(),
                field_type: "string".to_string(),
                format: String::new(),
                kind: FieldKind::Scalar,
                position: FieldPosition::Path,
            }],
        }]);
        let reference = field("shelf", "ShelfName", FieldKind::Reference, FieldPosition::Path);

        let flattened = ParameterValidator::validate_path_parameter(&reference, &model).unwrap();
        assert_eq!(flattened.name, "name");
        assert_eq!(flattened.field_type, "string");
        assert_eq!(flattened.kind, FieldKind::Scalar);
        assert_eq!(flattened.position, FieldPosition::Path);
        // The input field is untouched.
        assert_eq!(reference.field_type, "ShelfName");
    }

    #[test]
    fn test_multi_field_reference_fails() {
        let model = model_with(vec![TypeDefinition {
            name: "Pair".to_string(),
            description: String::new(),
            request_parameters: false,
            fields: vec![
                field("a", "string", FieldKind::Scalar, FieldPosition::Path),
                field("b", "string", FieldKind::Scalar, FieldPosition::Path),
            ],
        }]);
        let reference = field("pair", "Pair", FieldKind::Reference, FieldPosition::Path);

        assert!(matches!(
            ParameterValidator::validate_path_parameter(&reference, &model),
            Err(GeneratorError::InvalidPathParameter(name)) if name == "pair"
        ));
    }

    #[test]
    fn test_array_path_parameter_fails() {
        let f = field("ids", "string", FieldKind::Array, FieldPosition::Path);
        assert!(matches!(
            ParameterValidator::validate_path_parameter(&f, &model_with(vec![])),
            Err(GeneratorError::InvalidPathParameter(_))
        ));
    }

    #[test]
    fn test_query_parameter_shapes() {
        let scalar = field("limit", "integer", FieldKind::Scalar, FieldPosition::Query);
        assert!(ParameterValidator::validate_query_parameter(&scalar).is_ok());

        let scalar_array = field("tags", "string", FieldKind::Array, FieldPosition::Query);
        assert!(ParameterValidator::validate_query_parameter(&scalar_array).is_ok());

        let reference = field("filter", "Filter", FieldKind::Reference, FieldPosition::Query);
        assert!(ParameterValidator::validate_query_parameter(&reference).is_ok());

        let message_array = field("pets", "Pet", FieldKind::Array, FieldPosition::Query);
        assert!(matches!(
            ParameterValidator::validate_query_parameter(&message_array),
            Err(GeneratorError::InvalidQueryParameter(name)) if name == "pets"
        ));
    }
}
