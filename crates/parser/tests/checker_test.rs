//! Feature-checker tests: warning content and idempotence.

use openapi_grpc_transcoder_common::Severity;
use openapi_grpc_transcoder_parser::{FeatureChecker, OpenApiParser};
use std::path::PathBuf;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(name)
}

#[test]
fn test_bookstore_warnings() {
    let parser = OpenApiParser::from_file(testdata("bookstore.yaml")).unwrap();
    let warnings = FeatureChecker::new(parser.document()).run();

    assert!(warnings.iter().all(|w| w.severity == Severity::Warning));

    // The document declares tags, and the shared shelf parameter is marked
    // required; both are features the generator does not carry.
    let document_warning = warnings.iter().find(|w| w.code == "DOCUMENTFIELDS").unwrap();
    assert!(document_warning.text.contains("Tags"));
    assert!(document_warning.text.contains("Bookstore"));

    let parameter_warning = warnings.iter().find(|w| w.code == "PARAMETERFIELDS").unwrap();
    assert!(parameter_warning.text.contains("Required"));
    assert!(parameter_warning.text.contains("shelf"));
}

#[test]
fn test_schema_constraint_and_enum_warnings() {
    let yaml = r#"
openapi: 3.0.0
info:
  title: Petstore
  version: "1.0"
paths: {}
components:
  schemas:
    pet:
      type: object
      properties:
        status:
          type: string
          enum: [available, pending, sold]
        age:
          type: integer
          minimum: 0
          maximum: 30
"#;
    let parser = OpenApiParser::from_yaml(yaml).unwrap();
    let warnings = FeatureChecker::new(parser.document()).run();

    let enum_warning = warnings
        .iter()
        .find(|w| w.text.contains("Enum is not generated as enum"))
        .unwrap();
    assert_eq!(enum_warning.code, "SCHEMAFIELDS");
    assert!(enum_warning.text.contains("status"));

    let age_warning = warnings
        .iter()
        .find(|w| w.text.contains("the schema: age"))
        .unwrap();
    assert!(age_warning.text.contains("Maximum"));
    assert!(age_warning.text.contains("Minimum"));
}

#[test]
fn test_checker_is_idempotent() {
    let parser = OpenApiParser::from_file(testdata("bookstore.yaml")).unwrap();

    let first = FeatureChecker::new(parser.document()).run();
    let second = FeatureChecker::new(parser.document()).run();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_checker_never_escalates_unsupported_operations() {
    let yaml = r#"
openapi: 3.0.0
info:
  title: Odd
  version: "1.0"
paths:
  /things:
    get:
      operationId: listThings
      deprecated: true
      responses: {}
    head:
      summary: unsupported verb
"#;
    let parser = OpenApiParser::from_yaml(yaml).unwrap();
    let warnings = FeatureChecker::new(parser.document()).run();

    let path_warning = warnings.iter().find(|w| w.code == "PATHFIELDS").unwrap();
    assert!(path_warning.text.contains("Head"));

    let operation_warning = warnings.iter().find(|w| w.code == "OPERATIONFIELDS").unwrap();
    assert!(operation_warning.text.contains("Deprecated"));
    assert!(operation_warning.text.contains("listThings"));
}
