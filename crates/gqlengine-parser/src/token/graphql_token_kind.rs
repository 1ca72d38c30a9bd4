use std::borrow::Cow;

/// The kind of a GraphQL token.
///
/// # Lifetime Parameter
///
/// The `'src` lifetime enables zero-copy lexing: names and numbers borrow
/// slices directly from the source text using `Cow::Borrowed`. String values
/// are only borrowed when they contain no escape sequences.
///
/// # Negative Numeric Literals
///
/// Negative numbers like `-123` are lexed as single tokens (e.g.
/// `IntValue("-123")`), not as separate minus and number tokens.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphQLTokenKind<'src> {
    // =========================================================================
    // Punctuators
    // =========================================================================
    /// `&`
    Ampersand,
    /// `@`
    At,
    /// `!`
    Bang,
    /// `:`
    Colon,
    /// `}`
    CurlyBraceClose,
    /// `{`
    CurlyBraceOpen,
    /// `$`
    Dollar,
    /// `...`
    Ellipsis,
    /// `=`
    Equals,
    /// `)`
    ParenClose,
    /// `(`
    ParenOpen,
    /// `|`
    Pipe,
    /// `]`
    SquareBracketClose,
    /// `[`
    SquareBracketOpen,

    // =========================================================================
    // Literals
    // =========================================================================
    /// A GraphQL name/identifier.
    Name(Cow<'src, str>),

    /// Raw source text of an integer literal, including optional negative sign
    /// (e.g. `"-123"`, `"0"`). Use [`GraphQLTokenKind::parse_int_value()`].
    IntValue(Cow<'src, str>),

    /// Raw source text of a float literal, including optional negative sign
    /// (e.g. `"-1.23e-4"`). Use [`GraphQLTokenKind::parse_float_value()`].
    FloatValue(Cow<'src, str>),

    /// The cooked (unescaped) contents of a string or block string literal.
    StringValue(Cow<'src, str>),

    /// The `true` literal.
    True,
    /// The `false` literal.
    False,
    /// The `null` literal.
    Null,

    /// End of input.
    Eof,

    /// A lexer error. The parser turns the first one it meets into a
    /// `GraphQLParseError` of kind `LexerError`.
    Error {
        message: String,
    },
}

impl<'src> GraphQLTokenKind<'src> {
    #[inline]
    pub fn name_borrowed(s: &'src str) -> Self {
        GraphQLTokenKind::Name(Cow::Borrowed(s))
    }

    #[inline]
    pub fn error(message: impl Into<String>) -> Self {
        GraphQLTokenKind::Error {
            message: message.into(),
        }
    }

    /// Returns the name this token spells, if it can act as a name.
    ///
    /// Per the GraphQL spec `true`, `false` and `null` match the Name regex
    /// and are valid names outside of value positions.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            GraphQLTokenKind::Name(name) => Some(name),
            GraphQLTokenKind::True => Some("true"),
            GraphQLTokenKind::False => Some("false"),
            GraphQLTokenKind::Null => Some("null"),
            _ => None,
        }
    }

    /// Parses an `IntValue` token's raw text.
    pub fn parse_int_value(&self) -> Option<Result<i64, std::num::ParseIntError>> {
        match self {
            GraphQLTokenKind::IntValue(raw) => Some(raw.parse::<i64>()),
            _ => None,
        }
    }

    /// Parses a `FloatValue` token's raw text.
    pub fn parse_float_value(&self) -> Option<Result<f64, std::num::ParseFloatError>> {
        match self {
            GraphQLTokenKind::FloatValue(raw) => Some(raw.parse::<f64>()),
            _ => None,
        }
    }

    /// A short, human-readable rendering of this token for error messages.
    pub fn display(&self) -> String {
        match self {
            GraphQLTokenKind::Ampersand => "&".to_string(),
            GraphQLTokenKind::At => "@".to_string(),
            GraphQLTokenKind::Bang => "!".to_string(),
            GraphQLTokenKind::Colon => ":".to_string(),
            GraphQLTokenKind::CurlyBraceClose => "}".to_string(),
            GraphQLTokenKind::CurlyBraceOpen => "{".to_string(),
            GraphQLTokenKind::Dollar => "$".to_string(),
            GraphQLTokenKind::Ellipsis => "...".to_string(),
            GraphQLTokenKind::Equals => "=".to_string(),
            GraphQLTokenKind::ParenClose => ")".to_string(),
            GraphQLTokenKind::ParenOpen => "(".to_string(),
            GraphQLTokenKind::Pipe => "|".to_string(),
            GraphQLTokenKind::SquareBracketClose => "]".to_string(),
            GraphQLTokenKind::SquareBracketOpen => "[".to_string(),
            GraphQLTokenKind::Name(name) => name.to_string(),
            GraphQLTokenKind::IntValue(raw) => raw.to_string(),
            GraphQLTokenKind::FloatValue(raw) => raw.to_string(),
            GraphQLTokenKind::StringValue(value) => format!("{value:?}"),
            GraphQLTokenKind::True => "true".to_string(),
            GraphQLTokenKind::False => "false".to_string(),
            GraphQLTokenKind::Null => "null".to_string(),
            GraphQLTokenKind::Eof => "end of input".to_string(),
            GraphQLTokenKind::Error { message } => message.clone(),
        }
    }
}
