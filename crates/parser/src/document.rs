//! OpenAPI 3.0 document model
//!
//! Deserialized representation of the parts of an OpenAPI description that
//! descriptor generation and the feature checker care about. Maps use
//! `IndexMap` so declaration order survives parsing; the order of emitted
//! messages, methods, and warnings depends on it.
//!
//! Fields the generator does not translate (servers, security, schema
//! constraints and so on) are still deserialized so the feature checker can
//! warn about their presence.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A component that is either declared inline or referenced by `$ref`.
///
/// The reference variant is listed first: an untagged `Schema` with all
/// fields defaulted would otherwise swallow `$ref`-only maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Item(T),
}

impl<T> RefOr<T> {
    pub fn as_item(&self) -> Option<&T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Reference { .. } => None,
        }
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            RefOr::Reference { reference } => Some(reference),
            RefOr::Item(_) => None,
        }
    }
}

/// OpenAPI document root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub openapi: String,
    pub info: Info,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    #[serde(default)]
    pub components: Option<Components>,

    #[serde(default)]
    pub servers: Option<Value>,
    #[serde(default)]
    pub security: Option<Value>,
    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(rename = "externalDocs", default)]
    pub external_docs: Option<Value>,
}

/// API metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Reusable components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, RefOr<Schema>>,

    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,

    #[serde(default)]
    pub parameters: IndexMap<String, RefOr<Parameter>>,

    #[serde(rename = "requestBodies", default)]
    pub request_bodies: IndexMap<String, RefOr<RequestBody>>,

    #[serde(default)]
    pub examples: Option<Value>,
    #[serde(default)]
    pub headers: Option<Value>,
    #[serde(rename = "securitySchemes", default)]
    pub security_schemes: Option<Value>,
    #[serde(default)]
    pub links: Option<Value>,
    #[serde(default)]
    pub callbacks: Option<Value>,
}

/// Operations declared for one path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<Operation>,
    #[serde(default)]
    pub put: Option<Operation>,
    #[serde(default)]
    pub post: Option<Operation>,
    #[serde(default)]
    pub delete: Option<Operation>,
    #[serde(default)]
    pub patch: Option<Operation>,

    #[serde(default)]
    pub head: Option<Value>,
    #[serde(default)]
    pub options: Option<Value>,
    #[serde(default)]
    pub trace: Option<Value>,
    #[serde(default)]
    pub servers: Option<Value>,
    #[serde(default)]
    pub parameters: Option<Value>,
}

impl PathItem {
    /// The supported operations of this path in translation order.
    pub fn operations(&self) -> Vec<(&'static str, &Operation)> {
        [
            ("GET", &self.get),
            ("PUT", &self.put),
            ("POST", &self.post),
            ("DELETE", &self.delete),
            ("PATCH", &self.patch),
        ]
        .into_iter()
        .filter_map(|(verb, op)| op.as_ref().map(|op| (verb, op)))
        .collect()
    }
}

/// HTTP operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,

    #[serde(rename = "requestBody", default)]
    pub request_body: Option<RefOr<RequestBody>>,

    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,

    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(rename = "externalDocs", default)]
    pub external_docs: Option<Value>,
    #[serde(default)]
    pub callbacks: Option<Value>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub security: Option<Value>,
    #[serde(default)]
    pub servers: Option<Value>,
}

/// Operation or component parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Location: "path", "query", "header", or "cookie".
    #[serde(rename = "in")]
    pub location: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub schema: Option<RefOr<Schema>>,

    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(rename = "allowEmptyValue", default)]
    pub allow_empty_value: bool,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub explode: bool,
    #[serde(rename = "allowReserved", default)]
    pub allow_reserved: bool,
    #[serde(default)]
    pub example: Option<Value>,
    #[serde(default)]
    pub examples: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,
}

/// Request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

/// Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default)]
    pub links: Option<Value>,
    #[serde(default)]
    pub headers: Option<Value>,
}

/// Media type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<RefOr<Schema>>,

    #[serde(default)]
    pub example: Option<Value>,
    #[serde(default)]
    pub examples: Option<Value>,
    #[serde(default)]
    pub encoding: Option<Value>,
}

/// The `additionalProperties` keyword: a schema, a reference, or a bare
/// boolean.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Flag(bool),
    Schema(Box<RefOr<Schema>>),
}

/// Schema definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Type: string, number, integer, boolean, array, object.
    #[serde(rename = "type", default)]
    pub schema_type: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub properties: IndexMap<String, RefOr<Schema>>,

    #[serde(default)]
    pub items: Option<Box<RefOr<Schema>>>,

    #[serde(rename = "additionalProperties", default)]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<Value>,

    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub discriminator: Option<Value>,
    #[serde(rename = "readOnly", default)]
    pub read_only: bool,
    #[serde(rename = "writeOnly", default)]
    pub write_only: bool,
    #[serde(default)]
    pub xml: Option<Value>,
    #[serde(rename = "externalDocs", default)]
    pub external_docs: Option<Value>,
    #[serde(default)]
    pub example: Option<Value>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "multipleOf", default)]
    pub multiple_of: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(rename = "exclusiveMaximum", default)]
    pub exclusive_maximum: bool,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(rename = "exclusiveMinimum", default)]
    pub exclusive_minimum: bool,
    #[serde(rename = "maxLength", default)]
    pub max_length: Option<u64>,
    #[serde(rename = "minLength", default)]
    pub min_length: Option<u64>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(rename = "maxItems", default)]
    pub max_items: Option<u64>,
    #[serde(rename = "minItems", default)]
    pub min_items: Option<u64>,
    #[serde(rename = "uniqueItems", default)]
    pub unique_items: bool,
    #[serde(rename = "maxProperties", default)]
    pub max_properties: Option<u64>,
    #[serde(rename = "minProperties", default)]
    pub min_properties: Option<u64>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(rename = "allOf", default)]
    pub all_of: Vec<Value>,
    #[serde(rename = "oneOf", default)]
    pub one_of: Vec<Value>,
    #[serde(rename = "anyOf", default)]
    pub any_of: Vec<Value>,
    #[serde(default)]
    pub not: Option<Value>,
    #[serde(rename = "default", default)]
    pub default_value: Option<Value>,
}

/// The component name a `$ref` points at, e.g.
/// `#/components/schemas/Shelf` -> `Shelf`.
pub fn reference_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Whether a `$ref` points outside the current document.
pub fn is_external_reference(reference: &str) -> bool {
    !reference.starts_with('#')
}
