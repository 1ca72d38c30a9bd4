//! AST types for parsed executable documents and SDL schema documents.
//!
//! Nodes own their strings so a parsed [`Document`] can outlive the source
//! text it came from. Every node that can be the target of a diagnostic
//! carries the [`AstPos`] of its first token.
//!
//! # Example
//!
//! ```rust
//! use gqlengine_parser::parse_executable_document;
//!
//! let doc = parse_executable_document("{ user(id: 1) { name } }").unwrap();
//! assert_eq!(doc.to_source_string(), "{ user(id: 1) { name } }");
//! ```

mod argument;
mod ast_node;
mod ast_pos;
mod document;
mod fragment_definition;
mod operation_definition;
mod schema_document;
mod selection;
mod type_annotation;
mod value;

pub use argument::Argument;
pub use argument::Directive;
pub use ast_node::AstNode;
pub use ast_pos::AstPos;
pub use document::Definition;
pub use document::Document;
pub use fragment_definition::FragmentDefinition;
pub use operation_definition::OperationDefinition;
pub use operation_definition::OperationKind;
pub use operation_definition::VariableDefinition;
pub use schema_document::FieldDefinition;
pub use schema_document::InputValueDefinition;
pub use schema_document::InterfaceTypeDefinition;
pub use schema_document::ObjectTypeDefinition;
pub use schema_document::ScalarTypeDefinition;
pub use schema_document::SchemaDefinition;
pub use schema_document::SchemaDocument;
pub use schema_document::TypeSystemDefinition;
pub use schema_document::UnionTypeDefinition;
pub use selection::Field;
pub use selection::FragmentSpread;
pub use selection::InlineFragment;
pub use selection::Selection;
pub use selection::SelectionSet;
pub use type_annotation::TypeAnnotation;
pub use value::Value;
