//! Diagnostics emitted by the feature checker
//!
//! Warnings are a side channel: they never block descriptor generation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A structured message about an OpenAPI feature the transcoder does not
/// translate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable machine-readable code, e.g. "SCHEMAFIELDS"
    pub code: String,

    pub severity: Severity,

    /// Human-readable description naming the node and the offending fields
    pub text: String,

    /// Path-like keys locating the node inside the document
    pub keys: Vec<String>,
}

impl Diagnostic {
    pub fn warning(code: &str, text: String, keys: Vec<String>) -> Self {
        Diagnostic {
            code: code.to_string(),
            severity: Severity::Warning,
            text,
            keys,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = Diagnostic::warning(
            "SCHEMAFIELDS",
            "Fields: Nullable are not supported for the schema: Shelf".to_string(),
            vec!["Shelf".to_string(), "Schema".to_string()],
        );
        assert_eq!(
            d.to_string(),
            "[WARNING] SCHEMAFIELDS: Fields: Nullable are not supported for the schema: Shelf"
        );
    }
}
