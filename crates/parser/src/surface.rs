//! Surface-model construction from an OpenAPI document
//!
//! Projects the document onto the intermediate representation the descriptor
//! generator consumes: one type per component schema, one parameter/response
//! container type per operation, and one method per operation. Shared
//! parameter references are resolved inline into the container, so parameter
//! names never collide with schema-derived message names. External `$ref`s
//! are collected into the model's dependency
//! list; the referenced names resolve once the external document has been
//! compiled into the same descriptor set.
//!
//! Inline object schemas (anonymous objects in properties, request bodies or
//! responses) are lifted into named types so every MESSAGE-typed field has a
//! resolvable target.

use crate::document::{
    is_external_reference, reference_name, AdditionalProperties, Document, Operation, Parameter,
    RefOr, RequestBody, Response, Schema,
};
use openapi_grpc_transcoder_common::{
    capitalize, FieldDefinition, FieldKind, FieldPosition, GeneratorError, MethodDefinition,
    Result, SurfaceModel, TypeDefinition,
};

/// Build the surface model for one document.
pub fn build_surface_model(document: &Document) -> Result<SurfaceModel> {
    let mut builder = SurfaceBuilder {
        document,
        types: Vec::new(),
        methods: Vec::new(),
        dependencies: Vec::new(),
    };
    builder.run()?;
    Ok(SurfaceModel {
        types: builder.types,
        methods: builder.methods,
        dependencies: builder.dependencies,
    })
}

struct SurfaceBuilder<'a> {
    document: &'a Document,
    types: Vec<TypeDefinition>,
    methods: Vec<MethodDefinition>,
    dependencies: Vec<String>,
}

impl SurfaceBuilder<'_> {
    fn run(&mut self) -> Result<()> {
        let document = self.document;
        if let Some(components) = &document.components {
            for (name, schema) in &components.schemas {
                if let RefOr::Item(schema) = schema {
                    let t = self.type_from_schema(name, schema)?;
                    self.types.push(t);
                }
            }
        }

        for (path, item) in &document.paths {
            for (verb, operation) in item.operations() {
                self.build_method(path, verb, operation)?;
            }
        }
        Ok(())
    }

    fn build_method(&mut self, path: &str, verb: &str, operation: &Operation) -> Result<()> {
        let method_name = match &operation.operation_id {
            Some(id) => capitalize(id),
            None => synthesize_method_name(verb, path),
        };

        let parameters_type_name = self.build_parameters_type(&method_name, operation)?;
        let responses_type_name = self.build_responses_type(&method_name, operation)?;

        self.methods.push(MethodDefinition {
            name: method_name,
            path: path.to_string(),
            http_method: verb.to_string(),
            parameters_type_name,
            responses_type_name,
        });
        Ok(())
    }

    /// The container type holding an operation's path/query/body fields.
    /// Returns an empty name when the operation takes nothing.
    fn build_parameters_type(&mut self, method_name: &str, operation: &Operation) -> Result<String> {
        let mut fields = Vec::new();

        for parameter in &operation.parameters {
            match parameter {
                RefOr::Item(parameter) => fields.push(self.field_from_parameter(parameter)?),
                RefOr::Reference { reference } => {
                    fields.push(self.parameter_reference_field(reference)?)
                }
            }
        }
        if let Some(body) = &operation.request_body {
            if let Some(field) = self.field_from_request_body(method_name, body)? {
                fields.push(field);
            }
        }

        if fields.is_empty() {
            return Ok(String::new());
        }
        let name = format!("{method_name}Parameters");
        self.types.push(TypeDefinition {
            description: format!("{name} holds parameters to {method_name}"),
            name: name.clone(),
            request_parameters: true,
            fields,
        });
        Ok(name)
    }

    /// The container type holding one field per documented response status.
    fn build_responses_type(&mut self, method_name: &str, operation: &Operation) -> Result<String> {
        let mut fields = Vec::new();
        for (status, response) in &operation.responses {
            if let Some(field) = self.field_from_response(status, response)? {
                fields.push(field);
            }
        }

        if fields.is_empty() {
            return Ok(String::new());
        }
        let name = format!("{method_name}Responses");
        self.types.push(TypeDefinition {
            description: format!("{name} holds responses of {method_name}"),
            name: name.clone(),
            request_parameters: false,
            fields,
        });
        Ok(name)
    }

    fn type_from_schema(&mut self, name: &str, schema: &Schema) -> Result<TypeDefinition> {
        let mut fields = Vec::new();
        for (property_name, property) in &schema.properties {
            fields.push(self.field_from_schema(property_name, property, FieldPosition::None)?);
        }
        Ok(TypeDefinition {
            name: name.to_string(),
            description: schema.description.clone().unwrap_or_default(),
            request_parameters: false,
            fields,
        })
    }

    fn field_from_parameter(&mut self, parameter: &Parameter) -> Result<FieldDefinition> {
        let position = position_for_location(&parameter.location);
        let schema = parameter.schema.as_ref().ok_or_else(|| {
            GeneratorError::Parse(format!(
                "parameter {} has no schema; content parameters are not supported",
                parameter.name
            ))
        })?;
        self.field_from_schema(&parameter.name, schema, position)
    }

    /// A field for a `$ref` to a shared parameter. Internal references are
    /// resolved inline against `components.parameters`; external ones are
    /// recorded as dependencies.
    fn parameter_reference_field(&mut self, reference: &str) -> Result<FieldDefinition> {
        let name = reference_name(reference).to_string();
        if is_external_reference(reference) {
            self.dependencies.push(reference.to_string());
            return Ok(FieldDefinition {
                name: name.clone(),
                field_type: name,
                format: String::new(),
                kind: FieldKind::Reference,
                position: FieldPosition::None,
            });
        }

        let parameter = self
            .document
            .components
            .as_ref()
            .and_then(|c| c.parameters.get(&name))
            .and_then(|p| p.as_item())
            .cloned()
            .ok_or_else(|| {
                GeneratorError::Parse(format!("unresolvable parameter reference {reference}"))
            })?;
        self.field_from_parameter(&parameter)
    }

    fn field_from_request_body(
        &mut self,
        method_name: &str,
        body: &RefOr<RequestBody>,
    ) -> Result<Option<FieldDefinition>> {
        let body = match body {
            RefOr::Item(body) => body.clone(),
            RefOr::Reference { reference } => {
                if is_external_reference(reference) {
                    self.dependencies.push(reference.to_string());
                    let name = reference_name(reference).to_string();
                    return Ok(Some(FieldDefinition {
                        name: name.clone(),
                        field_type: name,
                        format: String::new(),
                        kind: FieldKind::Reference,
                        position: FieldPosition::Body,
                    }));
                }
                let name = reference_name(reference);
                match self
                    .document
                    .components
                    .as_ref()
                    .and_then(|c| c.request_bodies.get(name))
                    .and_then(|b| b.as_item())
                {
                    Some(body) => body.clone(),
                    None => return Ok(None),
                }
            }
        };

        let Some(schema) = body.content.values().find_map(|media| media.schema.as_ref()) else {
            return Ok(None);
        };
        match schema {
            RefOr::Reference { reference } => {
                if is_external_reference(reference) {
                    self.dependencies.push(reference.to_string());
                }
                let name = reference_name(reference).to_string();
                Ok(Some(FieldDefinition {
                    name: name.clone(),
                    field_type: name,
                    format: String::new(),
                    kind: FieldKind::Reference,
                    position: FieldPosition::Body,
                }))
            }
            RefOr::Item(schema) => {
                // Anonymous body schemas are lifted into a named type.
                let type_name = format!("{method_name}RequestBody");
                let lifted = self.type_from_schema(&type_name, schema)?;
                self.types.push(lifted);
                Ok(Some(FieldDefinition {
                    name: "body".to_string(),
                    field_type: type_name,
                    format: String::new(),
                    kind: FieldKind::Reference,
                    position: FieldPosition::Body,
                }))
            }
        }
    }

    fn field_from_response(
        &mut self,
        status: &str,
        response: &RefOr<Response>,
    ) -> Result<Option<FieldDefinition>> {
        let response = match response {
            RefOr::Item(response) => response.clone(),
            RefOr::Reference { reference } => {
                if is_external_reference(reference) {
                    self.dependencies.push(reference.to_string());
                    let name = reference_name(reference).to_string();
                    return Ok(Some(FieldDefinition {
                        name: status.to_string(),
                        field_type: name,
                        format: String::new(),
                        kind: FieldKind::Reference,
                        position: FieldPosition::None,
                    }));
                }
                let name = reference_name(reference);
                match self
                    .document
                    .components
                    .as_ref()
                    .and_then(|c| c.responses.get(name))
                    .and_then(|r| r.as_item())
                {
                    Some(response) => response.clone(),
                    None => return Ok(None),
                }
            }
        };

        // Responses without content (e.g. 204) contribute no field.
        let Some(schema) = response.content.values().find_map(|media| media.schema.as_ref())
        else {
            return Ok(None);
        };
        Ok(Some(self.field_from_schema(
            status,
            schema,
            FieldPosition::None,
        )?))
    }

    fn field_from_schema(
        &mut self,
        name: &str,
        schema: &RefOr<Schema>,
        position: FieldPosition,
    ) -> Result<FieldDefinition> {
        match schema {
            RefOr::Reference { reference } => {
                if is_external_reference(reference) {
                    self.dependencies.push(reference.to_string());
                }
                Ok(FieldDefinition {
                    name: name.to_string(),
                    field_type: reference_name(reference).to_string(),
                    format: String::new(),
                    kind: FieldKind::Reference,
                    position,
                })
            }
            RefOr::Item(schema) => self.field_from_inline_schema(name, schema, position),
        }
    }

    fn field_from_inline_schema(
        &mut self,
        name: &str,
        schema: &Schema,
        position: FieldPosition,
    ) -> Result<FieldDefinition> {
        if let Some(AdditionalProperties::Schema(value)) = &schema.additional_properties {
            let value_type = self.map_value_type(value)?;
            return Ok(FieldDefinition {
                name: name.to_string(),
                field_type: format!("map[string]{value_type}"),
                format: String::new(),
                kind: FieldKind::Map,
                position,
            });
        }

        match schema.schema_type.as_deref() {
            Some("array") => {
                let items = schema.items.as_ref().ok_or_else(|| {
                    GeneratorError::Parse(format!("array schema {name} has no items"))
                })?;
                match items.as_ref() {
                    RefOr::Reference { reference } => {
                        if is_external_reference(reference) {
                            self.dependencies.push(reference.to_string());
                        }
                        Ok(FieldDefinition {
                            name: name.to_string(),
                            field_type: reference_name(reference).to_string(),
                            format: String::new(),
                            kind: FieldKind::Array,
                            position,
                        })
                    }
                    RefOr::Item(item) => Ok(FieldDefinition {
                        name: name.to_string(),
                        field_type: item.schema_type.clone().unwrap_or_default(),
                        format: item.format.clone().unwrap_or_default(),
                        kind: FieldKind::Array,
                        position,
                    }),
                }
            }
            Some("string") | Some("integer") | Some("number") | Some("boolean") => {
                Ok(FieldDefinition {
                    name: name.to_string(),
                    field_type: schema.schema_type.clone().unwrap_or_default(),
                    format: schema.format.clone().unwrap_or_default(),
                    kind: FieldKind::Scalar,
                    position,
                })
            }
            Some("object") | None if !schema.properties.is_empty() => {
                // Lift the anonymous object into a named type.
                let type_name = capitalize(name);
                let lifted = self.type_from_schema(&type_name, schema)?;
                self.types.push(lifted);
                Ok(FieldDefinition {
                    name: name.to_string(),
                    field_type: type_name,
                    format: String::new(),
                    kind: FieldKind::Reference,
                    position,
                })
            }
            other => Err(GeneratorError::Parse(format!(
                "schema for field {name} has no mappable type (type: {})",
                other.unwrap_or("none")
            ))),
        }
    }

    /// The value-type token of a map field: a protobuf scalar name, a
    /// referenced message name, or `[]<item>` for array values (reported as
    /// unsupported during generation).
    fn map_value_type(&mut self, value: &RefOr<Schema>) -> Result<String> {
        match value {
            RefOr::Reference { reference } => {
                if is_external_reference(reference) {
                    self.dependencies.push(reference.to_string());
                }
                Ok(reference_name(reference).to_string())
            }
            RefOr::Item(schema) => match schema.schema_type.as_deref() {
                Some("array") => {
                    let item = match schema.items.as_deref() {
                        Some(RefOr::Reference { reference }) => {
                            reference_name(reference).to_string()
                        }
                        Some(RefOr::Item(item)) => item.schema_type.clone().unwrap_or_default(),
                        None => String::new(),
                    };
                    Ok(format!("[]{item}"))
                }
                Some(scalar) => Ok(protobuf_scalar_for(scalar, schema.format.as_deref())),
                None => Err(GeneratorError::Parse(
                    "map value schema has no type".to_string(),
                )),
            },
        }
    }
}

/// Protobuf scalar name for an OpenAPI scalar type, honoring an explicit
/// format when it already names a protobuf scalar.
fn protobuf_scalar_for(schema_type: &str, format: Option<&str>) -> String {
    if let Some(format) = format {
        return format.to_string();
    }
    match schema_type {
        "integer" => "int32",
        "number" => "float",
        "boolean" => "bool",
        _ => "string",
    }
    .to_string()
}

fn position_for_location(location: &str) -> FieldPosition {
    match location {
        "path" => FieldPosition::Path,
        "query" => FieldPosition::Query,
        _ => FieldPosition::None,
    }
}

/// A method name for operations without an `operationId`, derived from the
/// verb and the path segments, e.g. `GET /shelves/{shelf}` -> `GetShelvesShelf`.
fn synthesize_method_name(verb: &str, path: &str) -> String {
    let mut name = capitalize(&verb.to_lowercase());
    for segment in path.split('/') {
        let segment = segment.trim_matches(|c| c == '{' || c == '}');
        if !segment.is_empty() {
            name.push_str(&capitalize(segment));
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_method_name() {
        assert_eq!(synthesize_method_name("GET", "/shelves/{shelf}"), "GetShelvesShelf");
        assert_eq!(synthesize_method_name("POST", "/shelves"), "PostShelves");
    }

    #[test]
    fn test_protobuf_scalar_for() {
        assert_eq!(protobuf_scalar_for("integer", None), "int32");
        assert_eq!(protobuf_scalar_for("integer", Some("int64")), "int64");
        assert_eq!(protobuf_scalar_for("string", None), "string");
    }
}
