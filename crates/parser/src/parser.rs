//! OpenAPI description file parser

use crate::document::Document;
use crate::surface::build_surface_model;
use openapi_grpc_transcoder_common::{GeneratorError, Result, SurfaceModel};
use std::fs;
use std::path::Path;

/// Parses an OpenAPI 3 description and exposes its document and surface model
pub struct OpenApiParser {
    document: Document,
}

impl OpenApiParser {
    /// Load an OpenAPI description from disk, dispatching on the file
    /// extension (`.json` is parsed as JSON, everything else as YAML).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!("failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: Document = serde_yaml::from_str(yaml)?;
        Ok(OpenApiParser { document })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: Document = serde_json::from_str(json)?;
        Ok(OpenApiParser { document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Build the surface model the descriptor generator consumes.
    pub fn surface_model(&self) -> Result<SurfaceModel> {
        build_surface_model(&self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_and_json_parse_to_same_document() {
        let yaml = "openapi: 3.0.0\ninfo:\n  title: Bookstore\n  version: '1.0'\npaths: {}\n";
        let json = r#"{"openapi":"3.0.0","info":{"title":"Bookstore","version":"1.0"},"paths":{}}"#;

        let from_yaml = OpenApiParser::from_yaml(yaml).unwrap();
        let from_json = OpenApiParser::from_json(json).unwrap();
        assert_eq!(from_yaml.document().info.title, "Bookstore");
        assert_eq!(from_json.document().info.title, "Bookstore");
    }

    #[test]
    fn test_invalid_document_is_a_parse_error() {
        let result = OpenApiParser::from_yaml("openapi: [not, a, document]");
        assert!(matches!(result, Err(GeneratorError::Yaml(_))));
    }
}
