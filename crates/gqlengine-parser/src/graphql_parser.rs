//! Recursive descent parser for GraphQL documents.
//!
//! This module provides [`GraphQLParser`], a generic parser that works with any
//! token source implementing [`GraphQLTokenSource`]. It parses executable
//! documents (operations and fragments), SDL schema documents, and standalone
//! type annotations.
//!
//! # Errors
//!
//! Parsing halts at the first lexical or syntactic error. Every `parse_*`
//! method returns a [`ParseResult`], and the first `Err` propagates up to the
//! caller with `?`; no partial AST is produced.

use crate::ast;
use crate::GraphQLParseError;
use crate::GraphQLParseErrorKind;
use crate::GraphQLSourceSpan;
use crate::GraphQLTokenStream;
use crate::SourcePosition;
use crate::token::GraphQLToken;
use crate::token::GraphQLTokenKind;
use crate::token_source::GraphQLTokenSource;
use crate::token_source::StrGraphQLTokenSource;
use smallvec::SmallVec;
use std::path::Path;

pub type ParseResult<T> = Result<T, GraphQLParseError>;

/// Context in which a delimiter was opened, for error messages.
#[derive(Debug, Clone, Copy)]
enum DelimiterContext {
    /// `schema { ... }`
    SchemaDefinition,
    /// `type Foo { ... }` / `interface Foo { ... }`
    FieldsDefinition,
    /// `{ field ... }` in operations/fragments
    SelectionSet,
    /// `(arg: value)` in field or directive arguments
    Arguments,
    /// `($var: Type)` in operation variable definitions
    VariableDefinitions,
    /// `(name: Type)` in field argument definitions
    ArgumentDefinitions,
    /// `[Type]` in type annotations
    ListType,
    /// `[value, ...]` in list literals
    ListValue,
    /// `{ field: value }` in object literals
    ObjectValue,
}

impl DelimiterContext {
    fn description(&self) -> &'static str {
        match self {
            DelimiterContext::SchemaDefinition => "schema definition",
            DelimiterContext::FieldsDefinition => "fields definition",
            DelimiterContext::SelectionSet => "selection set",
            DelimiterContext::Arguments => "arguments",
            DelimiterContext::VariableDefinitions => "variable definitions",
            DelimiterContext::ArgumentDefinitions => "argument definitions",
            DelimiterContext::ListType => "list type annotation",
            DelimiterContext::ListValue => "list value",
            DelimiterContext::ObjectValue => "object value",
        }
    }
}

#[derive(Debug, Clone)]
struct OpenDelimiter {
    delimiter: &'static str,
    span: GraphQLSourceSpan,
    context: DelimiterContext,
}

/// Whether variables may appear in a value being parsed.
#[derive(Clone, Copy, Debug, PartialEq)]
enum ValueContext {
    /// Field and directive arguments in an executable document.
    AllowVariables,
    /// Default values and SDL directive arguments.
    Const,
}

/// Recursive descent parser over a [`GraphQLTokenSource`].
///
/// # Example
///
/// ```
/// use gqlengine_parser::GraphQLParser;
///
/// let doc = GraphQLParser::new("query Q { hello }")
///     .parse_executable_document()
///     .unwrap();
/// assert_eq!(doc.operations().count(), 1);
/// ```
pub struct GraphQLParser<'src, TTokenSource: GraphQLTokenSource<'src>> {
    token_stream: GraphQLTokenStream<'src, TTokenSource>,

    /// Stack of currently open delimiters, used to report which `{`, `(` or
    /// `[` was left unclosed when the input ends early.
    delimiter_stack: SmallVec<[OpenDelimiter; 8]>,

    /// Current nesting depth across selection sets, values and type
    /// annotations.
    recursion_depth: usize,

    /// End position of the most recently consumed token.
    last_end_position: Option<SourcePosition>,
}

impl<'src> GraphQLParser<'src, StrGraphQLTokenSource<'src>> {
    /// Creates a new parser from a string-like source.
    pub fn new<S: AsRef<str> + ?Sized>(source: &'src S) -> Self {
        Self::from_token_source(StrGraphQLTokenSource::new(source.as_ref()))
    }

    /// Creates a parser whose error spans carry `path`.
    pub fn with_file_path<S: AsRef<str> + ?Sized>(
        source: &'src S,
        path: &'src Path,
    ) -> Self {
        Self::from_token_source(StrGraphQLTokenSource::with_file_path(
            source.as_ref(),
            path,
        ))
    }
}

impl<'src, TTokenSource: GraphQLTokenSource<'src>> GraphQLParser<'src, TTokenSource> {
    /// Maximum nesting depth for recursive parsing (values, selection sets,
    /// and type annotations).
    const MAX_RECURSION_DEPTH: usize = 64;

    pub fn from_token_source(token_source: TTokenSource) -> Self {
        Self {
            token_stream: GraphQLTokenStream::new(token_source),
            delimiter_stack: SmallVec::new(),
            recursion_depth: 0,
            last_end_position: None,
        }
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Parses an executable document: one or more operations plus any number
    /// of fragment definitions.
    pub fn parse_executable_document(mut self) -> ParseResult<ast::Document> {
        let mut definitions = Vec::new();

        while !self.token_stream.is_at_end() {
            let keyword = self.peek_name_owned();
            let definition = match keyword.as_deref() {
                _ if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) => {
                    ast::Definition::Operation(self.parse_operation_definition()?)
                },
                Some("query") | Some("mutation") => {
                    ast::Definition::Operation(self.parse_operation_definition()?)
                },
                Some("fragment") => {
                    ast::Definition::Fragment(self.parse_fragment_definition()?)
                },
                Some("subscription") => {
                    return Err(self.unsupported_definition(
                        "subscription",
                        "subscription operations are not supported",
                    ));
                },
                Some(
                    kw @ ("schema" | "scalar" | "type" | "interface" | "union" | "enum"
                    | "input" | "directive" | "extend"),
                ) => {
                    let kw = kw.to_string();
                    return Err(self.unsupported_definition(
                        &kw,
                        "type system definitions are not allowed in an executable document",
                    ));
                },
                _ => {
                    return Err(self.unexpected(&[
                        "`{`",
                        "`query`",
                        "`mutation`",
                        "`fragment`",
                    ]));
                },
            };
            definitions.push(definition);
        }

        // Surface a trailing lexer error hidden behind `is_at_end()`.
        self.expect_eof()?;

        let document = ast::Document { definitions };
        if document.operations().next().is_none() {
            let span = self.eof_span();
            return Err(GraphQLParseError::new(
                "document must contain at least one operation",
                span,
                GraphQLParseErrorKind::MissingOperation,
            ));
        }
        Ok(document)
    }

    /// Parses an SDL document made of `schema`, `scalar`, `type`,
    /// `interface` and `union` definitions.
    pub fn parse_schema_document(mut self) -> ParseResult<ast::SchemaDocument> {
        let mut definitions = Vec::new();

        while !self.token_stream.is_at_end() {
            let description = self.parse_description();
            let keyword = self.peek_name_owned();
            let definition = match keyword.as_deref() {
                Some("schema") if description.is_none() => {
                    ast::TypeSystemDefinition::Schema(self.parse_schema_definition()?)
                },
                Some("scalar") => ast::TypeSystemDefinition::Scalar(
                    self.parse_scalar_type_definition(description)?,
                ),
                Some("type") => ast::TypeSystemDefinition::Object(
                    self.parse_object_type_definition(description)?,
                ),
                Some("interface") => ast::TypeSystemDefinition::Interface(
                    self.parse_interface_type_definition(description)?,
                ),
                Some("union") => ast::TypeSystemDefinition::Union(
                    self.parse_union_type_definition(description)?,
                ),
                Some(kw @ ("enum" | "input" | "directive" | "extend")) => {
                    let kw = kw.to_string();
                    return Err(self.unsupported_definition(
                        &kw,
                        &format!("`{kw}` definitions are not supported"),
                    ));
                },
                Some(kw @ ("query" | "mutation" | "subscription" | "fragment")) => {
                    let kw = kw.to_string();
                    return Err(self.unsupported_definition(
                        &kw,
                        "executable definitions are not allowed in a schema document",
                    ));
                },
                _ => {
                    return Err(self.unexpected(&[
                        "`schema`",
                        "`scalar`",
                        "`type`",
                        "`interface`",
                        "`union`",
                    ]));
                },
            };
            definitions.push(definition);
        }

        self.expect_eof()?;
        Ok(ast::SchemaDocument { definitions })
    }

    /// Parses a complete input consisting of a single type annotation such as
    /// `[User!]!`.
    pub fn parse_type_annotation_only(mut self) -> ParseResult<ast::TypeAnnotation> {
        let annotation = self.parse_type_annotation()?;
        self.expect_eof()?;
        Ok(annotation)
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn consume_token(&mut self) -> Option<GraphQLToken<'src>> {
        let token = self.token_stream.consume()?;
        self.last_end_position = Some(token.span.end_exclusive);
        Some(token)
    }

    /// Consumes the next token, failing on end of input or a lexer error.
    fn next_token(&mut self) -> ParseResult<GraphQLToken<'src>> {
        if let Some(token) = self.token_stream.peek()
            && let GraphQLTokenKind::Error { message } = &token.kind
        {
            return Err(GraphQLParseError::new(
                message.clone(),
                token.span.clone(),
                GraphQLParseErrorKind::LexerError,
            ));
        }
        match self.consume_token() {
            Some(token) => Ok(token),
            None => Err(self.eof_error(self.eof_span(), vec![], "token")),
        }
    }

    fn peek_is(&mut self, kind: &GraphQLTokenKind<'_>) -> bool {
        matches!(self.token_stream.peek(), Some(token) if token.kind == *kind)
    }

    fn peek_is_keyword(&mut self, keyword: &str) -> bool {
        matches!(
            self.token_stream.peek(),
            Some(GraphQLToken { kind: GraphQLTokenKind::Name(name), .. }) if &**name == keyword
        )
    }

    /// Returns the next token's text if it can act as a name.
    fn peek_name_owned(&mut self) -> Option<String> {
        self.token_stream
            .peek()
            .and_then(|token| token.kind.as_name())
            .map(str::to_string)
    }

    fn peek_position(&mut self) -> ast::AstPos {
        match self.token_stream.peek() {
            Some(token) => token.span.start_inclusive.to_ast_pos(),
            None => self.eof_span().start_inclusive.to_ast_pos(),
        }
    }

    /// Span used for errors at the end of input.
    fn eof_span(&self) -> GraphQLSourceSpan {
        GraphQLSourceSpan::empty_at(self.last_end_position.unwrap_or_default())
    }

    /// Expects a specific punctuator and consumes it.
    fn expect(&mut self, kind: &GraphQLTokenKind<'_>) -> ParseResult<GraphQLToken<'src>> {
        if self.peek_is(kind) {
            return self.next_token();
        }
        let expected = format!("`{}`", kind.display());
        Err(self.unexpected(&[&expected]))
    }

    /// Expects a specific keyword (a name token with the given text).
    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<GraphQLToken<'src>> {
        if self.peek_is_keyword(keyword) {
            return self.next_token();
        }
        let expected = format!("`{keyword}`");
        Err(self.unexpected(&[&expected]))
    }

    /// Expects a name and returns it along with the position of its token.
    ///
    /// `true`, `false` and `null` are valid names outside of value positions.
    fn expect_name(&mut self) -> ParseResult<(String, GraphQLSourceSpan)> {
        match self.peek_name_owned() {
            Some(name) => {
                let token = self.next_token()?;
                Ok((name, token.span))
            },
            None => Err(self.unexpected(&["name"])),
        }
    }

    fn expect_eof(&mut self) -> ParseResult<()> {
        match self.token_stream.peek() {
            None => Ok(()),
            Some(GraphQLToken { kind: GraphQLTokenKind::Eof, .. }) => Ok(()),
            Some(_) => Err(self.unexpected(&["end of input"])),
        }
    }

    fn push_delimiter(
        &mut self,
        delimiter: &'static str,
        span: GraphQLSourceSpan,
        context: DelimiterContext,
    ) {
        self.delimiter_stack.push(OpenDelimiter {
            delimiter,
            span,
            context,
        });
    }

    fn pop_delimiter(&mut self) {
        self.delimiter_stack.pop();
    }

    fn enter_recursion(&mut self) -> ParseResult<()> {
        if self.recursion_depth >= Self::MAX_RECURSION_DEPTH {
            let span = match self.token_stream.peek() {
                Some(token) => token.span.clone(),
                None => self.eof_span(),
            };
            return Err(GraphQLParseError::new(
                "maximum nesting depth exceeded",
                span,
                GraphQLParseErrorKind::RecursionLimitExceeded,
            ));
        }
        self.recursion_depth += 1;
        Ok(())
    }

    fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    // =========================================================================
    // Error construction
    // =========================================================================

    /// Builds the error for an unexpected next token.
    ///
    /// Lexer error tokens are reported with their own message; end of input
    /// inside an open delimiter is reported as an unclosed delimiter.
    fn unexpected(&mut self, expected: &[&str]) -> GraphQLParseError {
        let expected_list: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        let described = match expected {
            [single] => single.to_string(),
            _ => format!("one of {}", expected.join(", ")),
        };

        let (span, kind) = match self.token_stream.peek() {
            Some(token) => (token.span.clone(), Some(token.kind.clone())),
            None => (self.eof_span(), None),
        };

        match kind {
            Some(GraphQLTokenKind::Error { message }) => {
                GraphQLParseError::new(message, span, GraphQLParseErrorKind::LexerError)
            },
            None | Some(GraphQLTokenKind::Eof) => self.eof_error(span, expected_list, &described),
            Some(kind) => {
                let found = kind.display();
                GraphQLParseError::new(
                    format!("expected {described}, found `{found}`"),
                    span,
                    GraphQLParseErrorKind::UnexpectedToken {
                        expected: expected_list,
                        found,
                    },
                )
            },
        }
    }

    fn eof_error(
        &self,
        span: GraphQLSourceSpan,
        expected: Vec<String>,
        described: &str,
    ) -> GraphQLParseError {
        if let Some(open) = self.delimiter_stack.last() {
            let mut error = GraphQLParseError::new(
                format!("unclosed `{}` in {}", open.delimiter, open.context.description()),
                span,
                GraphQLParseErrorKind::UnclosedDelimiter {
                    delimiter: open.delimiter.to_string(),
                },
            );
            error.add_note(format!(
                "opening `{}` here at {}",
                open.delimiter,
                open.span.start_inclusive.to_ast_pos(),
            ));
            return error;
        }
        GraphQLParseError::new(
            format!("expected {described}, found end of input"),
            span,
            GraphQLParseErrorKind::UnexpectedEof { expected },
        )
    }

    fn unsupported_definition(&mut self, definition: &str, message: &str) -> GraphQLParseError {
        let span = match self.token_stream.peek() {
            Some(token) => token.span.clone(),
            None => self.eof_span(),
        };
        GraphQLParseError::new(
            message,
            span,
            GraphQLParseErrorKind::UnsupportedDefinition {
                definition: definition.to_string(),
            },
        )
    }

    fn empty_construct(span: GraphQLSourceSpan, construct: &str) -> GraphQLParseError {
        GraphQLParseError::new(
            format!("{construct} cannot be empty"),
            span,
            GraphQLParseErrorKind::InvalidEmptyConstruct {
                construct: construct.to_string(),
            },
        )
    }

    // =========================================================================
    // Values
    // =========================================================================

    fn parse_value(&mut self, context: ValueContext) -> ParseResult<ast::Value> {
        self.enter_recursion()?;
        let result = self.parse_value_impl(context);
        self.exit_recursion();
        result
    }

    fn parse_value_impl(&mut self, context: ValueContext) -> ParseResult<ast::Value> {
        let (span, kind) = match self.token_stream.peek() {
            Some(token) => (token.span.clone(), token.kind.clone()),
            None => return Err(self.unexpected(&["value"])),
        };

        match kind {
            GraphQLTokenKind::Dollar => {
                if context == ValueContext::Const {
                    return Err(GraphQLParseError::new(
                        "variables are not allowed in constant values",
                        span,
                        GraphQLParseErrorKind::UnexpectedToken {
                            expected: vec!["constant value".to_string()],
                            found: "$".to_string(),
                        },
                    ));
                }
                self.next_token()?;
                let (name, _) = self.expect_name()?;
                Ok(ast::Value::Variable(name))
            },
            GraphQLTokenKind::IntValue(ref raw) => {
                let parsed = raw.parse::<i64>();
                self.next_token()?;
                parsed.map(ast::Value::Int).map_err(|_| {
                    GraphQLParseError::new(
                        format!("integer literal `{raw}` is out of range"),
                        span,
                        GraphQLParseErrorKind::InvalidValue,
                    )
                })
            },
            GraphQLTokenKind::FloatValue(ref raw) => {
                self.next_token()?;
                match raw.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(ast::Value::Float(value)),
                    _ => Err(GraphQLParseError::new(
                        format!("float literal `{raw}` is out of range"),
                        span,
                        GraphQLParseErrorKind::InvalidValue,
                    )),
                }
            },
            GraphQLTokenKind::StringValue(value) => {
                self.next_token()?;
                Ok(ast::Value::String(value.into_owned()))
            },
            GraphQLTokenKind::True => {
                self.next_token()?;
                Ok(ast::Value::Boolean(true))
            },
            GraphQLTokenKind::False => {
                self.next_token()?;
                Ok(ast::Value::Boolean(false))
            },
            GraphQLTokenKind::Null => {
                self.next_token()?;
                Ok(ast::Value::Null)
            },
            GraphQLTokenKind::Name(name) => {
                self.next_token()?;
                Ok(ast::Value::Enum(name.into_owned()))
            },
            GraphQLTokenKind::SquareBracketOpen => self.parse_list_value(context),
            GraphQLTokenKind::CurlyBraceOpen => self.parse_object_value(context),
            _ => Err(self.unexpected(&["value"])),
        }
    }

    /// `[value, ...]`. An empty list is a valid value.
    fn parse_list_value(&mut self, context: ValueContext) -> ParseResult<ast::Value> {
        let open = self.expect(&GraphQLTokenKind::SquareBracketOpen)?;
        self.push_delimiter("[", open.span, DelimiterContext::ListValue);

        let mut items = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::SquareBracketClose) {
            items.push(self.parse_value(context)?);
        }

        self.expect(&GraphQLTokenKind::SquareBracketClose)?;
        self.pop_delimiter();
        Ok(ast::Value::List(items))
    }

    /// `{ name: value, ... }`. An empty object is a valid value.
    fn parse_object_value(&mut self, context: ValueContext) -> ParseResult<ast::Value> {
        let open = self.expect(&GraphQLTokenKind::CurlyBraceOpen)?;
        self.push_delimiter("{", open.span, DelimiterContext::ObjectValue);

        let mut fields = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            let (name, _) = self.expect_name()?;
            self.expect(&GraphQLTokenKind::Colon)?;
            let value = self.parse_value(context)?;
            fields.push((name, value));
        }

        self.expect(&GraphQLTokenKind::CurlyBraceClose)?;
        self.pop_delimiter();
        Ok(ast::Value::Object(fields))
    }

    // =========================================================================
    // Type annotations
    // =========================================================================

    fn parse_type_annotation(&mut self) -> ParseResult<ast::TypeAnnotation> {
        self.enter_recursion()?;
        let result = self.parse_type_annotation_impl();
        self.exit_recursion();
        result
    }

    fn parse_type_annotation_impl(&mut self) -> ParseResult<ast::TypeAnnotation> {
        let annotation = if self.peek_is(&GraphQLTokenKind::SquareBracketOpen) {
            let open = self.next_token()?;
            self.push_delimiter("[", open.span, DelimiterContext::ListType);
            let inner = self.parse_type_annotation()?;
            self.expect(&GraphQLTokenKind::SquareBracketClose)?;
            self.pop_delimiter();
            ast::TypeAnnotation::list(inner)
        } else {
            let (name, _) = self.expect_name()?;
            ast::TypeAnnotation::named(name)
        };

        if self.peek_is(&GraphQLTokenKind::Bang) {
            self.next_token()?;
            return Ok(annotation.non_null());
        }
        Ok(annotation)
    }

    // =========================================================================
    // Directives and arguments
    // =========================================================================

    fn parse_directives(&mut self, context: ValueContext) -> ParseResult<Vec<ast::Directive>> {
        let mut directives = Vec::new();
        while self.peek_is(&GraphQLTokenKind::At) {
            let at = self.next_token()?;
            let (name, _) = self.expect_name()?;
            let arguments = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
                self.parse_arguments(context)?
            } else {
                Vec::new()
            };
            directives.push(ast::Directive {
                name,
                arguments,
                position: at.span.start_inclusive.to_ast_pos(),
            });
        }
        Ok(directives)
    }

    /// `(name: value, ...)`. Empty parentheses are an error.
    fn parse_arguments(&mut self, context: ValueContext) -> ParseResult<Vec<ast::Argument>> {
        let open = self.expect(&GraphQLTokenKind::ParenOpen)?;
        if self.peek_is(&GraphQLTokenKind::ParenClose) {
            return Err(Self::empty_construct(open.span, "argument list"));
        }
        self.push_delimiter("(", open.span, DelimiterContext::Arguments);

        let mut arguments = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::ParenClose) {
            let (name, name_span) = self.expect_name()?;
            self.expect(&GraphQLTokenKind::Colon)?;
            let value = self.parse_value(context)?;
            arguments.push(ast::Argument {
                name,
                value,
                position: name_span.start_inclusive.to_ast_pos(),
            });
        }

        self.expect(&GraphQLTokenKind::ParenClose)?;
        self.pop_delimiter();
        Ok(arguments)
    }

    // =========================================================================
    // Selection sets
    // =========================================================================

    fn parse_selection_set(&mut self) -> ParseResult<ast::SelectionSet> {
        self.enter_recursion()?;
        let result = self.parse_selection_set_impl();
        self.exit_recursion();
        result
    }

    fn parse_selection_set_impl(&mut self) -> ParseResult<ast::SelectionSet> {
        let open = self.expect(&GraphQLTokenKind::CurlyBraceOpen)?;
        let position = open.span.start_inclusive.to_ast_pos();
        if self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            return Err(Self::empty_construct(open.span, "selection set"));
        }
        self.push_delimiter("{", open.span, DelimiterContext::SelectionSet);

        let mut items = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            items.push(self.parse_selection()?);
        }

        self.expect(&GraphQLTokenKind::CurlyBraceClose)?;
        self.pop_delimiter();
        Ok(ast::SelectionSet { items, position })
    }

    fn parse_selection(&mut self) -> ParseResult<ast::Selection> {
        if !self.peek_is(&GraphQLTokenKind::Ellipsis) {
            return Ok(ast::Selection::Field(self.parse_field()?));
        }

        let ellipsis = self.next_token()?;
        let position = ellipsis.span.start_inclusive.to_ast_pos();

        if self.peek_is_keyword("on")
            || self.peek_is(&GraphQLTokenKind::At)
            || self.peek_is(&GraphQLTokenKind::CurlyBraceOpen)
        {
            let type_condition = if self.peek_is_keyword("on") {
                self.next_token()?;
                Some(self.expect_name()?.0)
            } else {
                None
            };
            let directives = self.parse_directives(ValueContext::AllowVariables)?;
            let selection_set = self.parse_selection_set()?;
            return Ok(ast::Selection::InlineFragment(ast::InlineFragment {
                type_condition,
                directives,
                selection_set,
                position,
            }));
        }

        let (fragment_name, _) = self.expect_name()?;
        let directives = self.parse_directives(ValueContext::AllowVariables)?;
        Ok(ast::Selection::FragmentSpread(ast::FragmentSpread {
            fragment_name,
            directives,
            position,
        }))
    }

    /// `alias: name(args) @directives { selections }`
    fn parse_field(&mut self) -> ParseResult<ast::Field> {
        let (first_name, first_span) = self.expect_name()?;
        let position = first_span.start_inclusive.to_ast_pos();

        let (alias, name) = if self.peek_is(&GraphQLTokenKind::Colon) {
            self.next_token()?;
            let (field_name, _) = self.expect_name()?;
            (Some(first_name), field_name)
        } else {
            (None, first_name)
        };

        let arguments = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
            self.parse_arguments(ValueContext::AllowVariables)?
        } else {
            Vec::new()
        };
        let directives = self.parse_directives(ValueContext::AllowVariables)?;
        let selection_set = if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            Some(self.parse_selection_set()?)
        } else {
            None
        };

        Ok(ast::Field {
            alias,
            name,
            arguments,
            directives,
            selection_set,
            position,
        })
    }

    // =========================================================================
    // Executable definitions
    // =========================================================================

    fn parse_operation_definition(&mut self) -> ParseResult<ast::OperationDefinition> {
        if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            let position = self.peek_position();
            let selection_set = self.parse_selection_set()?;
            return Ok(ast::OperationDefinition {
                kind: ast::OperationKind::Query,
                name: None,
                variable_definitions: Vec::new(),
                directives: Vec::new(),
                selection_set,
                position,
            });
        }

        let (keyword, keyword_span) = self.expect_name()?;
        let kind = match keyword.as_str() {
            "query" => ast::OperationKind::Query,
            "mutation" => ast::OperationKind::Mutation,
            other => {
                return Err(GraphQLParseError::new(
                    format!("expected `query` or `mutation`, found `{other}`"),
                    keyword_span,
                    GraphQLParseErrorKind::UnexpectedToken {
                        expected: vec!["`query`".to_string(), "`mutation`".to_string()],
                        found: other.to_string(),
                    },
                ));
            },
        };

        let name = match self.peek_name_owned() {
            Some(_) => Some(self.expect_name()?.0),
            None => None,
        };
        let variable_definitions = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
            self.parse_variable_definitions()?
        } else {
            Vec::new()
        };
        let directives = self.parse_directives(ValueContext::AllowVariables)?;
        let selection_set = self.parse_selection_set()?;

        Ok(ast::OperationDefinition {
            kind,
            name,
            variable_definitions,
            directives,
            selection_set,
            position: keyword_span.start_inclusive.to_ast_pos(),
        })
    }

    fn parse_variable_definitions(&mut self) -> ParseResult<Vec<ast::VariableDefinition>> {
        let open = self.expect(&GraphQLTokenKind::ParenOpen)?;
        if self.peek_is(&GraphQLTokenKind::ParenClose) {
            return Err(Self::empty_construct(open.span, "variable definition list"));
        }
        self.push_delimiter("(", open.span, DelimiterContext::VariableDefinitions);

        let mut definitions = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::ParenClose) {
            let dollar = self.expect(&GraphQLTokenKind::Dollar)?;
            let (name, _) = self.expect_name()?;
            self.expect(&GraphQLTokenKind::Colon)?;
            let var_type = self.parse_type_annotation()?;
            let default_value = if self.peek_is(&GraphQLTokenKind::Equals) {
                self.next_token()?;
                Some(self.parse_value(ValueContext::Const)?)
            } else {
                None
            };
            definitions.push(ast::VariableDefinition {
                name,
                var_type,
                default_value,
                position: dollar.span.start_inclusive.to_ast_pos(),
            });
        }

        self.expect(&GraphQLTokenKind::ParenClose)?;
        self.pop_delimiter();
        Ok(definitions)
    }

    /// `fragment Name on Type @directives { selections }`
    fn parse_fragment_definition(&mut self) -> ParseResult<ast::FragmentDefinition> {
        let keyword = self.expect_keyword("fragment")?;
        let (name, name_span) = self.expect_name()?;
        if name == "on" {
            return Err(GraphQLParseError::new(
                "fragment name cannot be `on`",
                name_span,
                GraphQLParseErrorKind::ReservedName { name },
            ));
        }
        self.expect_keyword("on")?;
        let (type_condition, _) = self.expect_name()?;
        let directives = self.parse_directives(ValueContext::AllowVariables)?;
        let selection_set = self.parse_selection_set()?;

        Ok(ast::FragmentDefinition {
            name,
            type_condition,
            directives,
            selection_set,
            position: keyword.span.start_inclusive.to_ast_pos(),
        })
    }

    // =========================================================================
    // Type system definitions
    // =========================================================================

    /// Consumes a leading string literal, if any.
    fn parse_description(&mut self) -> Option<String> {
        let description = match self.token_stream.peek() {
            Some(GraphQLToken {
                kind: GraphQLTokenKind::StringValue(value),
                ..
            }) => value.to_string(),
            _ => return None,
        };
        self.consume_token();
        Some(description)
    }

    /// `schema @directives { query: Query mutation: Mutation }`
    fn parse_schema_definition(&mut self) -> ParseResult<ast::SchemaDefinition> {
        let keyword = self.expect_keyword("schema")?;
        let directives = self.parse_directives(ValueContext::Const)?;
        let open = self.expect(&GraphQLTokenKind::CurlyBraceOpen)?;
        if self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            return Err(Self::empty_construct(open.span, "schema definition"));
        }
        self.push_delimiter("{", open.span, DelimiterContext::SchemaDefinition);

        let mut root_operations = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            let (operation, operation_span) = self.expect_name()?;
            let kind = match operation.as_str() {
                "query" => ast::OperationKind::Query,
                "mutation" => ast::OperationKind::Mutation,
                "subscription" => {
                    return Err(GraphQLParseError::new(
                        "subscription operations are not supported",
                        operation_span,
                        GraphQLParseErrorKind::UnsupportedDefinition {
                            definition: operation,
                        },
                    ));
                },
                other => {
                    return Err(GraphQLParseError::new(
                        format!("expected `query` or `mutation`, found `{other}`"),
                        operation_span,
                        GraphQLParseErrorKind::UnexpectedToken {
                            expected: vec!["`query`".to_string(), "`mutation`".to_string()],
                            found: other.to_string(),
                        },
                    ));
                },
            };
            self.expect(&GraphQLTokenKind::Colon)?;
            let (type_name, _) = self.expect_name()?;
            root_operations.push((kind, type_name));
        }

        self.expect(&GraphQLTokenKind::CurlyBraceClose)?;
        self.pop_delimiter();
        Ok(ast::SchemaDefinition {
            root_operations,
            directives,
            position: keyword.span.start_inclusive.to_ast_pos(),
        })
    }

    fn parse_scalar_type_definition(
        &mut self,
        description: Option<String>,
    ) -> ParseResult<ast::ScalarTypeDefinition> {
        let keyword = self.expect_keyword("scalar")?;
        let (name, _) = self.expect_name()?;
        let directives = self.parse_directives(ValueContext::Const)?;
        Ok(ast::ScalarTypeDefinition {
            description,
            name,
            directives,
            position: keyword.span.start_inclusive.to_ast_pos(),
        })
    }

    fn parse_object_type_definition(
        &mut self,
        description: Option<String>,
    ) -> ParseResult<ast::ObjectTypeDefinition> {
        let keyword = self.expect_keyword("type")?;
        let (name, _) = self.expect_name()?;
        let implements = self.parse_implements_interfaces()?;
        let directives = self.parse_directives(ValueContext::Const)?;
        let fields = self.parse_fields_definition()?;
        Ok(ast::ObjectTypeDefinition {
            description,
            name,
            implements,
            directives,
            fields,
            position: keyword.span.start_inclusive.to_ast_pos(),
        })
    }

    fn parse_interface_type_definition(
        &mut self,
        description: Option<String>,
    ) -> ParseResult<ast::InterfaceTypeDefinition> {
        let keyword = self.expect_keyword("interface")?;
        let (name, _) = self.expect_name()?;
        let implements = self.parse_implements_interfaces()?;
        let directives = self.parse_directives(ValueContext::Const)?;
        let fields = self.parse_fields_definition()?;
        Ok(ast::InterfaceTypeDefinition {
            description,
            name,
            implements,
            directives,
            fields,
            position: keyword.span.start_inclusive.to_ast_pos(),
        })
    }

    /// `union Name @directives = | A | B`
    fn parse_union_type_definition(
        &mut self,
        description: Option<String>,
    ) -> ParseResult<ast::UnionTypeDefinition> {
        let keyword = self.expect_keyword("union")?;
        let (name, _) = self.expect_name()?;
        let directives = self.parse_directives(ValueContext::Const)?;

        let mut members = Vec::new();
        if self.peek_is(&GraphQLTokenKind::Equals) {
            self.next_token()?;
            if self.peek_is(&GraphQLTokenKind::Pipe) {
                self.next_token()?;
            }
            members.push(self.expect_name()?.0);
            while self.peek_is(&GraphQLTokenKind::Pipe) {
                self.next_token()?;
                members.push(self.expect_name()?.0);
            }
        }

        Ok(ast::UnionTypeDefinition {
            description,
            name,
            directives,
            members,
            position: keyword.span.start_inclusive.to_ast_pos(),
        })
    }

    /// `implements & A & B`
    fn parse_implements_interfaces(&mut self) -> ParseResult<Vec<String>> {
        let mut interfaces = Vec::new();
        if !self.peek_is_keyword("implements") {
            return Ok(interfaces);
        }
        self.next_token()?;
        if self.peek_is(&GraphQLTokenKind::Ampersand) {
            self.next_token()?;
        }
        interfaces.push(self.expect_name()?.0);
        while self.peek_is(&GraphQLTokenKind::Ampersand) {
            self.next_token()?;
            interfaces.push(self.expect_name()?.0);
        }
        Ok(interfaces)
    }

    /// `{ field: Type ... }`. Absent braces mean no fields; empty braces are
    /// an error.
    fn parse_fields_definition(&mut self) -> ParseResult<Vec<ast::FieldDefinition>> {
        if !self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            return Ok(Vec::new());
        }
        let open = self.next_token()?;
        if self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            return Err(Self::empty_construct(open.span, "fields definition"));
        }
        self.push_delimiter("{", open.span, DelimiterContext::FieldsDefinition);

        let mut fields = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            let description = self.parse_description();
            let (name, name_span) = self.expect_name()?;
            let arguments = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
                self.parse_arguments_definition()?
            } else {
                Vec::new()
            };
            self.expect(&GraphQLTokenKind::Colon)?;
            let field_type = self.parse_type_annotation()?;
            let directives = self.parse_directives(ValueContext::Const)?;
            fields.push(ast::FieldDefinition {
                description,
                name,
                arguments,
                field_type,
                directives,
                position: name_span.start_inclusive.to_ast_pos(),
            });
        }

        self.expect(&GraphQLTokenKind::CurlyBraceClose)?;
        self.pop_delimiter();
        Ok(fields)
    }

    /// `(name: Type = default @directives, ...)`
    fn parse_arguments_definition(&mut self) -> ParseResult<Vec<ast::InputValueDefinition>> {
        let open = self.expect(&GraphQLTokenKind::ParenOpen)?;
        if self.peek_is(&GraphQLTokenKind::ParenClose) {
            return Err(Self::empty_construct(open.span, "argument definition list"));
        }
        self.push_delimiter("(", open.span, DelimiterContext::ArgumentDefinitions);

        let mut arguments = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::ParenClose) {
            let description = self.parse_description();
            let (name, name_span) = self.expect_name()?;
            self.expect(&GraphQLTokenKind::Colon)?;
            let value_type = self.parse_type_annotation()?;
            let default_value = if self.peek_is(&GraphQLTokenKind::Equals) {
                self.next_token()?;
                Some(self.parse_value(ValueContext::Const)?)
            } else {
                None
            };
            let directives = self.parse_directives(ValueContext::Const)?;
            arguments.push(ast::InputValueDefinition {
                description,
                name,
                value_type,
                default_value,
                directives,
                position: name_span.start_inclusive.to_ast_pos(),
            });
        }

        self.expect(&GraphQLTokenKind::ParenClose)?;
        self.pop_delimiter();
        Ok(arguments)
    }
}
