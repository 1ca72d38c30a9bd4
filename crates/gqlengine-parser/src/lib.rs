//! A GraphQL parser for executable documents and the SDL subset used to
//! describe schemas.
//!
//! The crate is layered the same way the parse runs: a
//! [`StrGraphQLTokenSource`](token_source::StrGraphQLTokenSource) lexes text
//! into [`GraphQLToken`](token::GraphQLToken)s, a [`GraphQLTokenStream`]
//! buffers lookahead, and [`GraphQLParser`] builds the [`ast`].

pub mod ast;
mod graphql_parse_error;
mod graphql_parse_error_kind;
mod graphql_parser;
mod graphql_source_span;
mod graphql_token_stream;
mod source_position;
pub mod token;
pub mod token_source;

pub use graphql_parse_error::GraphQLParseError;
pub use graphql_parse_error_kind::GraphQLParseErrorKind;
pub use graphql_parser::GraphQLParser;
pub use graphql_parser::ParseResult;
pub use graphql_source_span::GraphQLSourceSpan;
pub use graphql_token_stream::GraphQLTokenStream;
pub use source_position::SourcePosition;

/// Parses an executable document (operations and fragments).
pub fn parse_executable_document(source: &str) -> ParseResult<ast::Document> {
    GraphQLParser::new(source).parse_executable_document()
}

/// Parses an SDL schema document.
pub fn parse_schema_document(source: &str) -> ParseResult<ast::SchemaDocument> {
    GraphQLParser::new(source).parse_schema_document()
}

/// Parses a standalone type annotation such as `[User!]!`.
pub fn parse_type_annotation(source: &str) -> ParseResult<ast::TypeAnnotation> {
    GraphQLParser::new(source).parse_type_annotation_only()
}

#[cfg(test)]
mod tests;
