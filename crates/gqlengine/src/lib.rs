//! A GraphQL query engine: a schema registry with resolver bindings, static
//! validation of executable documents, and asynchronous execution that
//! shapes resolver output into a response tree.
//!
//! ```rust
//! use gqlengine::object;
//! use gqlengine::FieldValue;
//! use gqlengine::SchemaBuilder;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let schema = SchemaBuilder::from_str("type Query { greeting: String }")
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! let schema = Arc::new(schema);
//! let document = gqlengine::parse("{ greeting }").unwrap();
//! let root = FieldValue::from(object! { greeting: "hello" });
//!
//! let response = gqlengine::execute(&document, None, &Default::default(), root, &schema)
//!     .await
//!     .unwrap();
//! assert_eq!(
//!     serde_json::to_string(&response).unwrap(),
//!     r#"{"data":{"greeting":"hello"}}"#,
//! );
//! # });
//! ```

mod coercion;
pub mod config;
mod engine;
mod execution;
pub mod resolver;
pub mod response;
pub mod schema;
pub mod types;
pub mod validation;
mod value;

pub use config::EngineConfig;
pub use engine::Engine;
pub use gqlengine_parser::ast;
pub use gqlengine_parser::GraphQLParseError;
pub use indexmap;
pub use resolver::sync_resolver;
pub use resolver::FieldValue;
pub use resolver::ObjectValue;
pub use resolver::Resolver;
pub use resolver::ResolverContext;
pub use resolver::ResolverError;
pub use resolver::ResolverResult;
pub use response::Cancelled;
pub use response::LocatedError;
pub use response::Location;
pub use response::PathSegment;
pub use response::Request;
pub use response::Response;
pub use response::ResultNode;
pub use schema::Schema;
pub use schema::SchemaBuilder;
pub use types::TypeRef;
pub use validation::validate;
pub use value::Value;

use indexmap::IndexMap;
use std::sync::Arc;

/// Parses an executable document.
pub fn parse(source: &str) -> Result<ast::Document, GraphQLParseError> {
    gqlengine_parser::parse_executable_document(source)
}

/// Validates and executes one operation of `document` against `schema` with
/// default options.
pub async fn execute(
    document: &ast::Document,
    operation_name: Option<&str>,
    variables: &IndexMap<String, Value>,
    root: FieldValue,
    schema: &Arc<Schema>,
) -> Result<Response, Cancelled> {
    Engine::new(Arc::clone(schema))
        .execute(document, operation_name, variables, root)
        .await
}

/// Parses, validates and executes `request` against `schema` with default
/// options.
pub async fn execute_request(
    schema: &Arc<Schema>,
    request: &Request,
    root: FieldValue,
) -> Result<Response, Cancelled> {
    Engine::new(Arc::clone(schema))
        .execute_request(request, root)
        .await
}
