//! Unsupported-feature detection
//!
//! Walks an OpenAPI document and emits one warning per node that carries
//! fields descriptor generation does not translate. Purely diagnostic:
//! the checker never fails, and running it twice yields the same ordered
//! warning list.

use crate::document::{
    AdditionalProperties, Components, Document, MediaType, Operation, Parameter, PathItem, RefOr,
    RequestBody, Response, Schema,
};
use openapi_grpc_transcoder_common::Diagnostic;

/// Reports which parts of a document are not carried into the descriptors
pub struct FeatureChecker<'a> {
    document: &'a Document,
    messages: Vec<Diagnostic>,
}

impl<'a> FeatureChecker<'a> {
    pub fn new(document: &'a Document) -> Self {
        FeatureChecker {
            document,
            messages: Vec::new(),
        }
    }

    /// Analyze the document. Warnings are ordered: document, components
    /// (schemas, responses, parameters, request bodies), then paths in
    /// declaration order, nested schemas depth-first.
    pub fn run(mut self) -> Vec<Diagnostic> {
        self.analyze_document();
        self.messages
    }

    fn analyze_document(&mut self) {
        let document = self.document;

        let fields = unsupported_document_fields(document);
        if !fields.is_empty() {
            self.warn(
                "DOCUMENTFIELDS",
                format!(
                    "Fields: {} are not supported for the document with title: {}",
                    fields.join(", "),
                    document.info.title
                ),
                vec!["Document".to_string()],
            );
        }

        if let Some(components) = &document.components {
            self.analyze_components(components);
        }
        for (path, item) in &document.paths {
            self.analyze_path_item(path, item);
        }
    }

    fn analyze_components(&mut self, components: &Components) {
        let fields = unsupported_components_fields(components);
        if !fields.is_empty() {
            self.warn(
                "COMPONENTSFIELDS",
                format!(
                    "Fields: {} are not supported for the component",
                    fields.join(", ")
                ),
                vec!["Component".to_string()],
            );
        }

        for (name, schema) in &components.schemas {
            self.analyze_schema(name, schema);
        }
        for (name, response) in &components.responses {
            self.analyze_response(name, response);
        }
        for (_, parameter) in &components.parameters {
            self.analyze_parameter(parameter);
        }
        for (name, body) in &components.request_bodies {
            self.analyze_request_body(name, body);
        }
    }

    fn analyze_path_item(&mut self, path: &str, item: &PathItem) {
        let fields = unsupported_path_item_fields(item);
        if !fields.is_empty() {
            self.warn(
                "PATHFIELDS",
                format!(
                    "Fields: {} are not supported for path: {}",
                    fields.join(", "),
                    path
                ),
                vec!["Paths".to_string(), path.to_string(), "Operation".to_string()],
            );
        }

        for (_, operation) in item.operations() {
            self.analyze_operation(operation);
        }
    }

    fn analyze_operation(&mut self, operation: &Operation) {
        let operation_id = operation.operation_id.clone().unwrap_or_default();

        let fields = unsupported_operation_fields(operation);
        if !fields.is_empty() {
            self.warn(
                "OPERATIONFIELDS",
                format!(
                    "Fields: {} are not supported for operation: {}",
                    fields.join(", "),
                    operation_id
                ),
                vec![
                    "Operation".to_string(),
                    operation_id.clone(),
                    "Callbacks".to_string(),
                ],
            );
        }

        for parameter in &operation.parameters {
            self.analyze_parameter(parameter);
        }
    }

    fn analyze_parameter(&mut self, parameter: &RefOr<Parameter>) {
        let Some(parameter) = parameter.as_item() else {
            return;
        };

        let fields = unsupported_parameter_fields(parameter);
        if !fields.is_empty() {
            self.warn(
                "PARAMETERFIELDS",
                format!(
                    "Fields: {} are not supported for parameter: {}",
                    fields.join(", "),
                    parameter.name
                ),
                vec!["Parameter".to_string(), parameter.name.clone()],
            );
        }
        if let Some(schema) = &parameter.schema {
            self.analyze_schema(&parameter.name, schema);
        }
    }

    fn analyze_schema(&mut self, identifier: &str, schema: &RefOr<Schema>) {
        let Some(schema) = schema.as_item() else {
            return;
        };

        let fields = unsupported_schema_fields(schema);
        if !fields.is_empty() {
            self.warn(
                "SCHEMAFIELDS",
                format!(
                    "Fields: {} are not supported for the schema: {}",
                    fields.join(", "),
                    identifier
                ),
                vec![identifier.to_string(), "Schema".to_string()],
            );
        }

        // Enums are silently translated to their underlying scalar type.
        if !schema.enum_values.is_empty() {
            self.warn(
                "SCHEMAFIELDS",
                format!("Field: Enum is not generated as enum in .proto for schema: {identifier}"),
                vec![identifier.to_string(), "Schema".to_string()],
            );
        }

        if let Some(items) = &schema.items {
            self.analyze_schema(&format!("Items of {identifier}"), items);
        }
        for (name, property) in &schema.properties {
            self.analyze_schema(name, property);
        }
        if let Some(AdditionalProperties::Schema(value)) = &schema.additional_properties {
            self.analyze_schema(&format!("AdditionalProperties of {identifier}"), value);
        }
    }

    fn analyze_response(&mut self, name: &str, response: &RefOr<Response>) {
        let Some(response) = response.as_item() else {
            return;
        };

        let fields = unsupported_response_fields(response);
        if !fields.is_empty() {
            self.warn(
                "RESPONSEFIELDS",
                format!(
                    "Fields: {} are not supported for response: {}",
                    fields.join(", "),
                    name
                ),
                vec!["Response".to_string(), name.to_string()],
            );
        }

        for (media_name, media) in &response.content {
            self.analyze_content(media_name, media);
        }
    }

    fn analyze_request_body(&mut self, name: &str, body: &RefOr<RequestBody>) {
        let Some(body) = body.as_item() else {
            return;
        };

        if body.required {
            self.warn(
                "REQUESTBODYFIELDS",
                format!("Fields: Required are not supported for the request: {name}"),
                vec!["RequestBody".to_string(), name.to_string()],
            );
        }
        for (media_name, media) in &body.content {
            self.analyze_content(media_name, media);
        }
    }

    fn analyze_content(&mut self, name: &str, media: &MediaType) {
        let fields = unsupported_media_type_fields(media);
        if !fields.is_empty() {
            self.warn(
                "MEDIATYPEFIELDS",
                format!(
                    "Fields: {} are not supported for the mediatype: {}",
                    fields.join(", "),
                    name
                ),
                vec!["MediaType".to_string(), name.to_string()],
            );
        }

        if let Some(schema) = &media.schema {
            self.analyze_schema(name, schema);
        }
    }

    fn warn(&mut self, code: &str, text: String, keys: Vec<String>) {
        self.messages.push(Diagnostic::warning(code, text, keys));
    }
}

fn unsupported_document_fields(document: &Document) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if document.servers.is_some() {
        fields.push("Servers");
    }
    if document.security.is_some() {
        fields.push("Security");
    }
    if document.tags.is_some() {
        fields.push("Tags");
    }
    if document.external_docs.is_some() {
        fields.push("ExternalDocs");
    }
    fields
}

fn unsupported_components_fields(components: &Components) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if components.examples.is_some() {
        fields.push("Examples");
    }
    if components.headers.is_some() {
        fields.push("Headers");
    }
    if components.security_schemes.is_some() {
        fields.push("SecuritySchemes");
    }
    if components.links.is_some() {
        fields.push("Links");
    }
    if components.callbacks.is_some() {
        fields.push("Callbacks");
    }
    fields
}

fn unsupported_path_item_fields(item: &PathItem) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if item.head.is_some() {
        fields.push("Head");
    }
    if item.options.is_some() {
        fields.push("Options");
    }
    if item.trace.is_some() {
        fields.push("Trace");
    }
    if item.servers.is_some() {
        fields.push("Servers");
    }
    if item.parameters.is_some() {
        fields.push("Parameters");
    }
    fields
}

fn unsupported_operation_fields(operation: &Operation) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if operation.tags.is_some() {
        fields.push("Tags");
    }
    if operation.external_docs.is_some() {
        fields.push("ExternalDocs");
    }
    if operation.callbacks.is_some() {
        fields.push("Callbacks");
    }
    if operation.deprecated {
        fields.push("Deprecated");
    }
    if operation.security.is_some() {
        fields.push("Security");
    }
    if operation.servers.is_some() {
        fields.push("Servers");
    }
    fields
}

fn unsupported_parameter_fields(parameter: &Parameter) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if parameter.required {
        fields.push("Required");
    }
    if parameter.deprecated {
        fields.push("Deprecated");
    }
    if parameter.allow_empty_value {
        fields.push("AllowEmptyValue");
    }
    if parameter.style.is_some() {
        fields.push("Style");
    }
    if parameter.explode {
        fields.push("Explode");
    }
    if parameter.allow_reserved {
        fields.push("AllowReserved");
    }
    if parameter.example.is_some() {
        fields.push("Example");
    }
    if parameter.examples.is_some() {
        fields.push("Examples");
    }
    if parameter.content.is_some() {
        fields.push("Content");
    }
    fields
}

fn unsupported_schema_fields(schema: &Schema) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if schema.nullable {
        fields.push("Nullable");
    }
    if schema.discriminator.is_some() {
        fields.push("Discriminator");
    }
    if schema.read_only {
        fields.push("ReadOnly");
    }
    if schema.write_only {
        fields.push("WriteOnly");
    }
    if schema.xml.is_some() {
        fields.push("Xml");
    }
    if schema.external_docs.is_some() {
        fields.push("ExternalDocs");
    }
    if schema.example.is_some() {
        fields.push("Example");
    }
    if schema.deprecated {
        fields.push("Deprecated");
    }
    if schema.title.is_some() {
        fields.push("Title");
    }
    if schema.multiple_of.is_some() {
        fields.push("MultipleOf");
    }
    if schema.maximum.is_some() {
        fields.push("Maximum");
    }
    if schema.exclusive_maximum {
        fields.push("ExclusiveMaximum");
    }
    if schema.minimum.is_some() {
        fields.push("Minimum");
    }
    if schema.exclusive_minimum {
        fields.push("ExclusiveMinimum");
    }
    if schema.max_length.is_some() {
        fields.push("MaxLength");
    }
    if schema.min_length.is_some() {
        fields.push("MinLength");
    }
    if schema.pattern.is_some() {
        fields.push("Pattern");
    }
    if schema.max_items.is_some() {
        fields.push("MaxItems");
    }
    if schema.min_items.is_some() {
        fields.push("MinItems");
    }
    if schema.unique_items {
        fields.push("UniqueItems");
    }
    if schema.max_properties.is_some() {
        fields.push("MaxProperties");
    }
    if schema.min_properties.is_some() {
        fields.push("MinProperties");
    }
    if !schema.required.is_empty() {
        fields.push("Required");
    }
    if !schema.all_of.is_empty() {
        fields.push("AllOf");
    }
    if !schema.one_of.is_empty() {
        fields.push("OneOf");
    }
    if !schema.any_of.is_empty() {
        fields.push("AnyOf");
    }
    if schema.not.is_some() {
        fields.push("Not");
    }
    if schema.default_value.is_some() {
        fields.push("Default");
    }
    fields
}

fn unsupported_response_fields(response: &Response) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if response.links.is_some() {
        fields.push("Links");
    }
    if response.headers.is_some() {
        fields.push("Headers");
    }
    fields
}

fn unsupported_media_type_fields(media: &MediaType) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if media.examples.is_some() {
        fields.push("Examples");
    }
    if media.example.is_some() {
        fields.push("Example");
    }
    if media.encoding.is_some() {
        fields.push("Encoding");
    }
    fields
}
