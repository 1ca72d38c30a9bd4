use crate::types::TypeKind;
use gqlengine_parser::ast::OperationKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SchemaBuildError {
    #[error("Multiple definitions of the `{operation}` root operation type were found")]
    DuplicateOperationDefinition {
        operation: OperationKind,
    },

    #[error("Multiple GraphQL types named `{type_name}` were defined")]
    DuplicateTypeDefinition {
        type_name: String,
    },

    #[error("The `{type_name}` type defines the `{field_name}` field more than once")]
    DuplicateFieldDefinition {
        type_name: String,
        field_name: String,
    },

    #[error(
        "The `{type_name}.{field_name}` field defines the `{argument_name}` \
        argument more than once"
    )]
    DuplicateArgumentDefinition {
        type_name: String,
        field_name: String,
        argument_name: String,
    },

    #[error(
        "The `{type_name}` type declares that it implements the \
        `{interface_name}` interface more than once"
    )]
    DuplicateInterfaceImplementsDeclaration {
        type_name: String,
        interface_name: String,
    },

    #[error("The `{union_name}` union lists `{member_name}` as a member more than once")]
    DuplicatedUnionMember {
        union_name: String,
        member_name: String,
    },

    #[error("A resolver is bound to `{type_name}.{field_name}` more than once")]
    DuplicateResolverBinding {
        type_name: String,
        field_name: String,
    },

    #[error("The `{type_name}` type must define one or more fields")]
    EmptyFieldsDefinition {
        type_name: String,
    },

    #[error("The `{union_name}` union must have one or more member types")]
    EmptyUnion {
        union_name: String,
    },

    #[error("Attempted to implement `{interface_name}`, which is not defined in the schema")]
    ImplementsUndefinedInterface {
        type_name: String,
        interface_name: String,
    },

    #[error(
        "The `{type_name}` type attempted to implement `{non_interface_type_name}`, \
        which is not an interface type"
    )]
    ImplementsNonInterfaceType {
        type_name: String,
        non_interface_type_name: String,
    },

    #[error(
        "Invalid argument type: `{type_name}.{field_name}` declares the \
        `{argument_name}` argument with type `{argument_type}`, which is not an \
        input type"
    )]
    InvalidArgumentType {
        type_name: String,
        field_name: String,
        argument_name: String,
        argument_type: String,
    },

    #[error(
        "Invalid default value for the `{argument_name}` argument of \
        `{type_name}.{field_name}`: {reason}"
    )]
    InvalidDefaultValue {
        type_name: String,
        field_name: String,
        argument_name: String,
        reason: String,
    },

    #[error(
        "The `{type_name}.{field_name}` field defines the `{argument_name}` \
        argument, which is not declared by `{interface_name}.{field_name}`. \
        Additional arguments on implementing fields must be optional."
    )]
    InvalidAdditionalFieldArgument {
        type_name: String,
        interface_name: String,
        field_name: String,
        argument_name: String,
    },

    #[error(
        "Invalid field type: `{type_name}.{field_name}` has type \
        `{actual_type}`, which is not compatible with the type \
        `{expected_type}` declared by `{interface_name}.{field_name}`"
    )]
    InvalidInterfaceSpecifiedFieldType {
        type_name: String,
        interface_name: String,
        field_name: String,
        expected_type: String,
        actual_type: String,
    },

    #[error(
        "Invalid argument type: `{type_name}.{field_name}` defines the \
        `{argument_name}` argument with type `{actual_type}`, but \
        `{interface_name}.{field_name}` defines it with type `{expected_type}`"
    )]
    InvalidInterfaceSpecifiedFieldArgumentType {
        type_name: String,
        interface_name: String,
        field_name: String,
        argument_name: String,
        expected_type: String,
        actual_type: String,
    },

    #[error("The `{operation}` root operation type `{type_name}` is a {kind:?} type, not an object type")]
    InvalidRootOperationTypeKind {
        operation: OperationKind,
        type_name: String,
        kind: TypeKind,
    },

    #[error("Invalid type annotation `{annotation}` on `{type_name}.{field_name}`: {message}")]
    InvalidTypeAnnotation {
        type_name: String,
        field_name: String,
        annotation: String,
        message: String,
    },

    #[error("The `{union_name}` union lists `{member_name}`, which is a {kind:?} type; union members must be object types")]
    InvalidUnionMemberTypeKind {
        union_name: String,
        member_name: String,
        kind: TypeKind,
    },

    #[error(
        "The `{type_name}` type must declare `{field_name}` with the \
        `{argument_name}` argument required by `{interface_name}.{field_name}`"
    )]
    MissingInterfaceSpecifiedFieldArgument {
        type_name: String,
        interface_name: String,
        field_name: String,
        argument_name: String,
    },

    #[error(
        "The `{type_name}` type implements the `{interface_name}` interface but \
        does not define its `{field_name}` field"
    )]
    MissingInterfaceSpecifiedField {
        type_name: String,
        interface_name: String,
        field_name: String,
    },

    #[error(
        "The `{type_name}` type implements `{interface_name}`, which implements \
        `{missing_interface_name}`, so `{type_name}` must also declare that it \
        implements `{missing_interface_name}`"
    )]
    MissingRecursiveInterfaceImplementation {
        type_name: String,
        interface_name: String,
        missing_interface_name: String,
    },

    #[error("No `{type_name}` object type was defined to serve as the query root operation type")]
    NoQueryOperationTypeDefined {
        type_name: String,
    },

    #[error("{source_name}:{line}:{column}: {message}")]
    ParseError {
        source_name: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Names starting with `__` are reserved: `{name}`")]
    ReservedName {
        name: String,
    },

    #[error("A resolver is bound to `{type_name}.{field_name}`, but `{type_name}` is not an object type")]
    ResolverOnNonObjectType {
        type_name: String,
        field_name: String,
    },

    #[error("A resolver is bound to `{type_name}.{field_name}`, which is not defined in the schema")]
    ResolverOnUndefinedField {
        type_name: String,
        field_name: String,
    },

    #[error("Failure while trying to read a schema file from disk")]
    SchemaFileReadError {
        path: PathBuf,
        message: String,
    },

    #[error("`{referencing_type}.{referencing_field}` references the undefined type `{undefined_type_name}`")]
    UndefinedTypeName {
        referencing_type: String,
        referencing_field: String,
        undefined_type_name: String,
    },

    #[error("The `{union_name}` union lists `{member_name}`, which is not defined in the schema")]
    UndefinedUnionMember {
        union_name: String,
        member_name: String,
    },

    #[error("The `{operation}` root operation type `{type_name}` is not defined in the schema")]
    UndefinedRootOperationType {
        operation: OperationKind,
        type_name: String,
    },
}
