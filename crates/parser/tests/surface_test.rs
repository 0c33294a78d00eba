//! Surface-model construction tests over a bookstore-style description.

use openapi_grpc_transcoder_common::{FieldKind, FieldPosition};
use openapi_grpc_transcoder_parser::OpenApiParser;
use std::path::PathBuf;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(name)
}

#[test]
fn test_bookstore_types() {
    let parser = OpenApiParser::from_file(testdata("bookstore.yaml")).unwrap();
    let model = parser.surface_model().unwrap();

    let shelf = model.type_by_name("shelf").unwrap().unwrap();
    assert!(!shelf.request_parameters);
    assert_eq!(shelf.fields.len(), 2);
    assert_eq!(shelf.fields[0].name, "name");
    assert_eq!(shelf.fields[0].field_type, "string");
    assert_eq!(shelf.fields[0].kind, FieldKind::Scalar);

    let list_response = model.type_by_name("listShelvesResponse").unwrap().unwrap();
    let shelves = &list_response.fields[0];
    assert_eq!(shelves.field_type, "shelf");
    assert_eq!(shelves.kind, FieldKind::Array);
}

#[test]
fn test_bookstore_parameter_containers() {
    let parser = OpenApiParser::from_file(testdata("bookstore.yaml")).unwrap();
    let model = parser.surface_model().unwrap();

    // The shared path parameter is resolved inline into the container.
    let get_shelf = model.type_by_name("GetShelfParameters").unwrap().unwrap();
    assert!(get_shelf.request_parameters);
    assert!(get_shelf
        .description
        .contains("GetShelfParameters holds parameters to"));
    let shelf = &get_shelf.fields[0];
    assert_eq!(shelf.name, "shelf");
    assert_eq!(shelf.field_type, "integer");
    assert_eq!(shelf.format, "int64");
    assert_eq!(shelf.kind, FieldKind::Scalar);
    assert_eq!(shelf.position, FieldPosition::Path);

    // Request bodies become Body-position reference fields.
    let create_shelf = model.type_by_name("CreateShelfParameters").unwrap().unwrap();
    let body = &create_shelf.fields[0];
    assert_eq!(body.name, "shelf");
    assert_eq!(body.field_type, "shelf");
    assert_eq!(body.kind, FieldKind::Reference);
    assert_eq!(body.position, FieldPosition::Body);
}

#[test]
fn test_bookstore_methods() {
    let parser = OpenApiParser::from_file(testdata("bookstore.yaml")).unwrap();
    let model = parser.surface_model().unwrap();

    let names: Vec<&str> = model.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["ListShelves", "CreateShelf", "GetShelf", "DeleteShelf"]
    );

    let list_shelves = &model.methods[0];
    assert_eq!(list_shelves.http_method, "GET");
    assert_eq!(list_shelves.path, "/shelves");
    assert_eq!(list_shelves.parameters_type_name, "");
    assert_eq!(list_shelves.responses_type_name, "ListShelvesResponses");

    // No response content at all: the generator will default to Empty.
    let delete_shelf = &model.methods[3];
    assert_eq!(delete_shelf.responses_type_name, "");
    assert_eq!(delete_shelf.path, "/shelves/{shelf}");
}

#[test]
fn test_external_references_collected_as_dependencies() {
    let yaml = r#"
openapi: 3.0.0
info:
  title: Orders
  version: "1.0"
paths:
  /orders:
    get:
      operationId: listOrders
      responses:
        "200":
          description: All orders.
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "pets.yaml#/components/schemas/Pet"
components:
  schemas:
    order:
      type: object
      properties:
        pet:
          $ref: "pets.yaml#/components/schemas/Pet"
"#;
    let parser = OpenApiParser::from_yaml(yaml).unwrap();
    let model = parser.surface_model().unwrap();

    assert_eq!(
        model.dependencies,
        vec![
            "pets.yaml#/components/schemas/Pet",
            "pets.yaml#/components/schemas/Pet",
        ]
    );

    let order = model.type_by_name("order").unwrap().unwrap();
    assert_eq!(order.fields[0].field_type, "Pet");
    assert_eq!(order.fields[0].kind, FieldKind::Reference);
}

#[test]
fn test_map_and_inline_object_fields() {
    let yaml = r#"
openapi: 3.0.0
info:
  title: Store
  version: "1.0"
paths: {}
components:
  schemas:
    inventory:
      type: object
      properties:
        counts:
          type: object
          additionalProperties:
            type: integer
        owner:
          type: object
          properties:
            name:
              type: string
"#;
    let parser = OpenApiParser::from_yaml(yaml).unwrap();
    let model = parser.surface_model().unwrap();

    let inventory = model.type_by_name("inventory").unwrap().unwrap();
    let counts = &inventory.fields[0];
    assert_eq!(counts.field_type, "map[string]int32");
    assert_eq!(counts.kind, FieldKind::Map);

    let owner = &inventory.fields[1];
    assert_eq!(owner.field_type, "Owner");
    assert_eq!(owner.kind, FieldKind::Reference);

    // The anonymous object was lifted into its own type.
    let lifted = model.type_by_name("Owner").unwrap().unwrap();
    assert_eq!(lifted.fields[0].name, "name");
}
