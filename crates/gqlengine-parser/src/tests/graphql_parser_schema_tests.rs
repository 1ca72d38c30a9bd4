//! Tests for the SDL subset and standalone type annotations.

use crate::ast;
use crate::parse_schema_document;
use crate::parse_type_annotation;
use crate::GraphQLParseErrorKind;

fn parse_sdl(source: &str) -> ast::SchemaDocument {
    match parse_schema_document(source) {
        Ok(doc) => doc,
        Err(err) => panic!("failed to parse SDL: {}", err.format_detailed(Some(source))),
    }
}

#[test]
fn parses_object_types_with_interfaces_and_arguments() {
    let doc = parse_sdl(
        r#"
        """
        A person.
        """
        type User implements & Node & Named @key(fields: "id") {
          "The id"
          id: ID!
          friends(first: Int = 10, after: String): [User!]!
        }
        "#,
    );

    let ast::TypeSystemDefinition::Object(user) = &doc.definitions[0] else {
        panic!("expected an object type, got {:?}", doc.definitions[0]);
    };
    assert_eq!(user.description.as_deref(), Some("A person."));
    assert_eq!(user.name, "User");
    assert_eq!(user.implements, vec!["Node".to_string(), "Named".to_string()]);
    assert_eq!(user.directives[0].name, "key");
    assert_eq!(user.fields.len(), 2);
    assert_eq!(user.fields[0].description.as_deref(), Some("The id"));
    assert_eq!(user.fields[0].field_type.to_string(), "ID!");

    let friends = &user.fields[1];
    assert_eq!(friends.field_type.to_string(), "[User!]!");
    assert_eq!(friends.arguments.len(), 2);
    assert_eq!(friends.arguments[0].default_value, Some(ast::Value::Int(10)));
    assert!(friends.arguments[1].default_value.is_none());
}

#[test]
fn parses_interfaces_unions_scalars_and_schema_block() {
    let doc = parse_sdl(
        "schema { query: Root mutation: Writes }\n\
         interface Node { id: ID! }\n\
         union SearchResult = | User | Post\n\
         scalar DateTime\n\
         type Empty",
    );

    let ast::TypeSystemDefinition::Schema(schema) = &doc.definitions[0] else {
        panic!("expected a schema definition");
    };
    assert_eq!(schema.root_type_name(ast::OperationKind::Query), Some("Root"));
    assert_eq!(schema.root_type_name(ast::OperationKind::Mutation), Some("Writes"));

    assert!(matches!(
        &doc.definitions[1],
        ast::TypeSystemDefinition::Interface(iface) if iface.name == "Node"
    ));
    assert!(matches!(
        &doc.definitions[2],
        ast::TypeSystemDefinition::Union(union)
            if union.members == vec!["User".to_string(), "Post".to_string()]
    ));
    assert!(matches!(
        &doc.definitions[3],
        ast::TypeSystemDefinition::Scalar(scalar) if scalar.name == "DateTime"
    ));
    assert!(matches!(
        &doc.definitions[4],
        ast::TypeSystemDefinition::Object(obj) if obj.fields.is_empty()
    ));
}

#[test]
fn rejects_unsupported_type_system_definitions() {
    for source in ["enum Color { RED }", "input Filter { a: Int }", "extend type Q { a: Int }"] {
        let err = match parse_schema_document(source) {
            Ok(doc) => panic!("expected an error for {source:?}, got {doc:?}"),
            Err(err) => err,
        };
        assert!(
            matches!(err.kind(), GraphQLParseErrorKind::UnsupportedDefinition { .. }),
            "unexpected error for {source:?}: {err}",
        );
    }
}

#[test]
fn rejects_operations_in_schema_documents() {
    let result = parse_schema_document("query { a }");
    assert!(matches!(
        result.map_err(|e| e.kind().clone()),
        Err(GraphQLParseErrorKind::UnsupportedDefinition { .. })
    ));
}

#[test]
fn rejects_empty_fields_definition() {
    let result = parse_schema_document("type Query {}");
    assert!(matches!(
        result.map_err(|e| e.kind().clone()),
        Err(GraphQLParseErrorKind::InvalidEmptyConstruct { .. })
    ));
}

#[test]
fn parses_standalone_type_annotations() {
    let parsed = parse_type_annotation("[[User!]]!").map(|t| t.to_string());
    assert_eq!(parsed, Ok("[[User!]]!".to_string()));

    let parsed = parse_type_annotation("String");
    assert_eq!(parsed, Ok(ast::TypeAnnotation::named("String")));

    assert!(parse_type_annotation("[String").is_err());
    assert!(parse_type_annotation("String extra").is_err());
}
