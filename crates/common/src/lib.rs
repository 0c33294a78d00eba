//! Common types and utilities for the OpenAPI gRPC transcoder
//!
//! This crate contains the surface model intermediate representation, the
//! error taxonomy, and the diagnostic types shared by the parser, generator,
//! and CLI components.

mod diagnostic;
mod model;

pub use diagnostic::{Diagnostic, Severity};
pub use model::{FieldDefinition, FieldKind, FieldPosition, MethodDefinition, SurfaceModel, TypeDefinition};

use thiserror::Error;

/// Errors that can occur during descriptor generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// No protobuf type corresponds to a surface field's declared type/format.
    #[error("unable to find a protobuf type for field {field} with type {field_type:?} and format {format:?}")]
    UnmappableType {
        field: String,
        field_type: String,
        format: String,
    },

    // The rendered text of the two parameter errors is a compatibility
    // contract; existing consumers match on these sentences.
    #[error("The path parameter with the name {0} is invalid. The path template may refer to one or more fields in the gRPC request message, as long as each field is a non-repeated field with a primitive (non-message) type")]
    InvalidPathParameter(String),

    #[error("The query parameter with the name {0} is invalid. Note that fields which are mapped to URL query parameters must have a primitive type or a repeated primitive type or a non-repeated message type")]
    InvalidQueryParameter(String),

    /// More than one surface type shares the name being looked up. This
    /// happens when multiple components inside merged OpenAPI descriptions
    /// carry the same name.
    #[error("multiple types with the name {0} exist inside the surface model")]
    AmbiguousTypeReference(String),

    /// Map value types that are themselves maps or arrays cannot be
    /// represented as a protobuf map entry.
    #[error("unsupported map value type {0}")]
    UnsupportedMapValueType(String),

    /// Descriptor pool assembly found a dangling message or enum type name.
    #[error("unresolvable type reference while assembling descriptors: {0}; this usually means a message type name was not fully qualified during generation")]
    UnresolvableReference(String),

    /// The external document loader failed for a referenced description.
    #[error("failed to load external document {url}: {reason}")]
    ExternalFetch { url: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for transcoder operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Uppercase the first character, protobuf message-name style.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("shelf"), "Shelf");
        assert_eq!(capitalize("listShelvesResponse"), "ListShelvesResponse");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_parameter_error_text_is_stable() {
        let err = GeneratorError::InvalidPathParameter("shelf".to_string());
        assert!(err
            .to_string()
            .starts_with("The path parameter with the name shelf is invalid."));

        let err = GeneratorError::InvalidQueryParameter("limit".to_string());
        assert!(err
            .to_string()
            .starts_with("The query parameter with the name limit is invalid."));
    }
}
