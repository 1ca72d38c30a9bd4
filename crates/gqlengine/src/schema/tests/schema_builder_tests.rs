use crate::resolver::sync_resolver;
use crate::resolver::FieldValue;
use crate::schema::SchemaBuildError;
use crate::schema::SchemaBuilder;
use crate::types::TypeKind;
use crate::types::TypeRef;
use gqlengine_parser::ast::OperationKind;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, SchemaBuildError>;

fn build_errors(sdl: &str) -> Vec<SchemaBuildError> {
    SchemaBuilder::from_str(sdl)
        .expect("sdl parses")
        .build()
        .expect_err("schema build fails")
}

mod basics {
    use super::*;

    #[test]
    fn build_without_load() {
        let errors = SchemaBuilder::new().build().unwrap_err();

        assert_eq!(errors, vec![SchemaBuildError::NoQueryOperationTypeDefined {
            type_name: "Query".to_string(),
        }]);
    }

    #[test]
    fn builtin_scalars_are_registered_first() -> Result<()> {
        let schema = SchemaBuilder::from_str("type Query { ok: Boolean }")?
            .build()
            .unwrap();

        let names: Vec<&str> = schema.types().map(|t| t.name()).collect();
        assert_eq!(names, vec!["String", "Int", "Float", "Boolean", "ID", "Query"]);
        assert_eq!(schema.type_named("ID").unwrap().kind(), TypeKind::Scalar);

        Ok(())
    }

    #[test]
    fn load_types_from_sdl() -> Result<()> {
        let schema = SchemaBuilder::from_str(concat!(
            "\"The entry point\"\n",
            "type Query { user(id: ID!, limit: Int = 10): User }\n",
            "type User { id: ID! name: String friends: [User!]! }\n",
        ))?
        .build()
        .unwrap();

        let query = schema.query_type();
        assert_eq!(query.name(), "Query");
        assert_eq!(query.description(), Some("The entry point"));

        let user_field = schema.field_on("Query", "user").unwrap();
        assert_eq!(user_field.field_type(), &TypeRef::named("User"));
        assert!(user_field.argument("id").unwrap().is_required());
        let limit = user_field.argument("limit").unwrap();
        assert!(!limit.is_required());
        assert_eq!(limit.default_value(), Some(&crate::Value::Int(10)));

        let friends = schema.field_on("User", "friends").unwrap();
        assert_eq!(friends.field_type().to_string(), "[User!]!");
        assert!(schema.field_on("User", "__typename").is_none());

        Ok(())
    }

    #[test]
    fn load_file() -> Result<()> {
        let path = std::env::temp_dir().join(format!(
            "gqlengine-schema-builder-{}.graphql",
            std::process::id(),
        ));
        std::fs::write(&path, "type Query { ok: Boolean }").unwrap();

        let schema = SchemaBuilder::new().load_file(&path)?.build().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(schema.field_on("Query", "ok").is_some());
        Ok(())
    }

    #[test]
    fn load_missing_file() {
        let path = PathBuf::from("/nonexistent/gqlengine/schema.graphql");

        let err = SchemaBuilder::new().load_file(&path).unwrap_err();

        assert!(matches!(
            err,
            SchemaBuildError::SchemaFileReadError { path: err_path, .. } if err_path == path,
        ));
    }

    #[test]
    fn sdl_syntax_error() {
        let err = SchemaBuilder::from_str("type Query {").unwrap_err();

        assert!(matches!(
            err,
            SchemaBuildError::ParseError { ref source_name, .. } if source_name == "<schema>",
        ));
    }

    #[test]
    fn duplicate_type_definition() {
        let errors = build_errors("type Query { a: Int } type Query { b: Int }");

        assert_eq!(errors, vec![SchemaBuildError::DuplicateTypeDefinition {
            type_name: "Query".to_string(),
        }]);
    }

    #[test]
    fn reserved_type_and_field_names() {
        let errors = build_errors("type Query { __secret: Int } type __Hidden { a: Int }");

        assert!(errors.contains(&SchemaBuildError::ReservedName {
            name: "__Hidden".to_string(),
        }));
        assert!(errors.contains(&SchemaBuildError::ReservedName {
            name: "Query.__secret".to_string(),
        }));
    }

    #[test]
    fn undefined_field_type() {
        let errors = build_errors("type Query { user: User }");

        assert_eq!(errors, vec![SchemaBuildError::UndefinedTypeName {
            referencing_type: "Query".to_string(),
            referencing_field: "user".to_string(),
            undefined_type_name: "User".to_string(),
        }]);
    }

    #[test]
    fn object_type_argument_is_rejected() {
        let errors = build_errors("type Query { find(filter: Filter): Int } type Filter { a: Int }");

        assert_eq!(errors, vec![SchemaBuildError::InvalidArgumentType {
            type_name: "Query".to_string(),
            field_name: "find".to_string(),
            argument_name: "filter".to_string(),
            argument_type: "Filter".to_string(),
        }]);
    }

    #[test]
    fn invalid_default_value() {
        let errors = build_errors("type Query { page(size: Int = \"ten\"): Int }");

        assert!(matches!(
            &errors[..],
            [SchemaBuildError::InvalidDefaultValue { argument_name, .. }] if argument_name == "size",
        ));
    }
}

mod root_operations {
    use super::*;

    #[test]
    fn default_root_names() -> Result<()> {
        let schema = SchemaBuilder::from_str(
            "type Query { a: Int } type Mutation { setA(a: Int): Int }",
        )?
        .build()
        .unwrap();

        assert_eq!(schema.root_type(OperationKind::Query).unwrap().name(), "Query");
        assert_eq!(schema.mutation_type().unwrap().name(), "Mutation");
        Ok(())
    }

    #[test]
    fn schema_definition_names_roots() -> Result<()> {
        let schema = SchemaBuilder::from_str(concat!(
            "schema { query: Root mutation: Writes }\n",
            "type Root { a: Int }\n",
            "type Writes { setA(a: Int): Int }\n",
        ))?
        .build()
        .unwrap();

        assert_eq!(schema.query_type().name(), "Root");
        assert_eq!(schema.mutation_type().unwrap().name(), "Writes");
        Ok(())
    }

    #[test]
    fn no_mutation_type() -> Result<()> {
        let schema = SchemaBuilder::from_str("type Query { a: Int }")?.build().unwrap();

        assert!(schema.mutation_type().is_none());
        assert!(schema.root_type(OperationKind::Mutation).is_none());
        Ok(())
    }

    #[test]
    fn undefined_root_type() {
        let errors = build_errors("schema { query: Root } type Query { a: Int }");

        assert_eq!(errors, vec![SchemaBuildError::UndefinedRootOperationType {
            operation: OperationKind::Query,
            type_name: "Root".to_string(),
        }]);
    }

    #[test]
    fn root_type_must_be_an_object() {
        let errors = build_errors(concat!(
            "schema { query: Query mutation: Node }\n",
            "type Query { a: Int }\n",
            "interface Node { id: ID! }\n",
        ));

        assert_eq!(errors, vec![SchemaBuildError::InvalidRootOperationTypeKind {
            operation: OperationKind::Mutation,
            type_name: "Node".to_string(),
            kind: TypeKind::Interface,
        }]);
    }

    #[test]
    fn duplicate_root_operation() {
        let errors = build_errors("schema { query: Query query: Query } type Query { a: Int }");

        assert_eq!(errors, vec![SchemaBuildError::DuplicateOperationDefinition {
            operation: OperationKind::Query,
        }]);
    }
}

mod interfaces {
    use super::*;

    #[test]
    fn possible_types_of_an_interface() -> Result<()> {
        let schema = SchemaBuilder::from_str(concat!(
            "type Query { widget: Widget }\n",
            "interface Widget { id: ID! }\n",
            "type Sprocket implements Widget { id: ID! teeth: Int }\n",
            "type Gadget implements Widget { id: ID! power: Int }\n",
        ))?
        .build()
        .unwrap();

        assert_eq!(schema.possible_types_of("Widget"), ["Sprocket", "Gadget"]);
        assert_eq!(schema.possible_types_of("Sprocket"), ["Sprocket"]);
        assert!(schema.is_subtype_compatible("Sprocket", "Widget"));
        assert!(!schema.is_subtype_compatible("Gadget", "Sprocket"));
        assert!(schema.types_overlap("Widget", "Gadget"));
        assert!(!schema.types_overlap("Sprocket", "Gadget"));
        Ok(())
    }

    #[test]
    fn missing_interface_field() {
        let errors = build_errors(concat!(
            "type Query { a: Int }\n",
            "interface Named { name: String }\n",
            "type User implements Named { id: ID }\n",
        ));

        assert_eq!(errors, vec![SchemaBuildError::MissingInterfaceSpecifiedField {
            type_name: "User".to_string(),
            interface_name: "Named".to_string(),
            field_name: "name".to_string(),
        }]);
    }

    #[test]
    fn covariant_field_types_are_accepted() -> Result<()> {
        SchemaBuilder::from_str(concat!(
            "type Query { node: Node }\n",
            "interface Node { id: ID next: Node }\n",
            "type User implements Node { id: ID! next: User }\n",
        ))?
        .build()
        .unwrap();

        Ok(())
    }

    #[test]
    fn incompatible_field_type() {
        let errors = build_errors(concat!(
            "type Query { a: Int }\n",
            "interface Named { name: String! }\n",
            "type User implements Named { name: String }\n",
        ));

        assert_eq!(errors, vec![SchemaBuildError::InvalidInterfaceSpecifiedFieldType {
            type_name: "User".to_string(),
            interface_name: "Named".to_string(),
            field_name: "name".to_string(),
            expected_type: "String!".to_string(),
            actual_type: "String".to_string(),
        }]);
    }

    #[test]
    fn argument_mismatches() {
        let errors = build_errors(concat!(
            "type Query { a: Int }\n",
            "interface Search { find(text: String, limit: Int): Int }\n",
            "type Index implements Search { find(text: ID, strict: Boolean!): Int }\n",
        ));

        assert!(errors.contains(&SchemaBuildError::InvalidInterfaceSpecifiedFieldArgumentType {
            type_name: "Index".to_string(),
            interface_name: "Search".to_string(),
            field_name: "find".to_string(),
            argument_name: "text".to_string(),
            expected_type: "String".to_string(),
            actual_type: "ID".to_string(),
        }));
        assert!(errors.contains(&SchemaBuildError::MissingInterfaceSpecifiedFieldArgument {
            type_name: "Index".to_string(),
            interface_name: "Search".to_string(),
            field_name: "find".to_string(),
            argument_name: "limit".to_string(),
        }));
        assert!(errors.contains(&SchemaBuildError::InvalidAdditionalFieldArgument {
            type_name: "Index".to_string(),
            interface_name: "Search".to_string(),
            field_name: "find".to_string(),
            argument_name: "strict".to_string(),
        }));
    }

    #[test]
    fn transitive_interfaces_must_be_declared() {
        let errors = build_errors(concat!(
            "type Query { a: Int }\n",
            "interface Node { id: ID }\n",
            "interface Resource implements Node { id: ID url: String }\n",
            "type Image implements Resource { id: ID url: String }\n",
        ));

        assert_eq!(errors, vec![SchemaBuildError::MissingRecursiveInterfaceImplementation {
            type_name: "Image".to_string(),
            interface_name: "Resource".to_string(),
            missing_interface_name: "Node".to_string(),
        }]);
    }

    #[test]
    fn implements_undefined_or_non_interface() {
        let errors = build_errors(concat!(
            "type Query implements Missing & User { a: Int }\n",
            "type User { a: Int }\n",
        ));

        assert_eq!(errors, vec![
            SchemaBuildError::ImplementsUndefinedInterface {
                type_name: "Query".to_string(),
                interface_name: "Missing".to_string(),
            },
            SchemaBuildError::ImplementsNonInterfaceType {
                type_name: "Query".to_string(),
                non_interface_type_name: "User".to_string(),
            },
        ]);
    }
}

mod unions {
    use super::*;

    #[test]
    fn members_are_possible_types() -> Result<()> {
        let schema = SchemaBuilder::from_str(concat!(
            "type Query { search: SearchResult }\n",
            "union SearchResult = User | Post\n",
            "type User { name: String }\n",
            "type Post { title: String }\n",
        ))?
        .build()
        .unwrap();

        assert_eq!(schema.possible_types_of("SearchResult"), ["User", "Post"]);
        assert!(schema.is_subtype_compatible("Post", "SearchResult"));
        Ok(())
    }

    #[test]
    fn undefined_and_non_object_members() {
        let errors = build_errors(concat!(
            "type Query { search: SearchResult }\n",
            "union SearchResult = User | Int\n",
        ));

        assert_eq!(errors, vec![
            SchemaBuildError::UndefinedUnionMember {
                union_name: "SearchResult".to_string(),
                member_name: "User".to_string(),
            },
            SchemaBuildError::InvalidUnionMemberTypeKind {
                union_name: "SearchResult".to_string(),
                member_name: "Int".to_string(),
                kind: TypeKind::Scalar,
            },
        ]);
    }

    #[test]
    fn duplicated_member() {
        let errors = build_errors(concat!(
            "type Query { search: SearchResult }\n",
            "union SearchResult = User | User\n",
            "type User { name: String }\n",
        ));

        assert_eq!(errors, vec![SchemaBuildError::DuplicatedUnionMember {
            union_name: "SearchResult".to_string(),
            member_name: "User".to_string(),
        }]);
    }
}

mod resolvers {
    use super::*;

    fn hello() -> impl crate::resolver::Resolver {
        sync_resolver(|_| Ok(FieldValue::from("hello")))
    }

    #[test]
    fn bound_resolver_is_found() -> Result<()> {
        let schema = SchemaBuilder::from_str("type Query { greeting: String other: Int }")?
            .resolver("Query", "greeting", hello())
            .build()
            .unwrap();

        assert!(schema.resolver_for("Query", "greeting").is_some());
        assert!(schema.resolver_for("Query", "other").is_none());
        Ok(())
    }

    #[test]
    fn binding_errors() -> Result<()> {
        let errors = SchemaBuilder::from_str(concat!(
            "type Query { greeting: String }\n",
            "interface Node { id: ID }\n",
        ))?
        .resolver("Query", "greeting", hello())
        .resolver("Query", "greeting", hello())
        .resolver("Query", "missing", hello())
        .resolver("Node", "id", hello())
        .build()
        .unwrap_err();

        assert_eq!(errors, vec![
            SchemaBuildError::DuplicateResolverBinding {
                type_name: "Query".to_string(),
                field_name: "greeting".to_string(),
            },
            SchemaBuildError::ResolverOnUndefinedField {
                type_name: "Query".to_string(),
                field_name: "missing".to_string(),
            },
            SchemaBuildError::ResolverOnNonObjectType {
                type_name: "Node".to_string(),
                field_name: "id".to_string(),
            },
        ]);
        Ok(())
    }
}
