/// Categorizes parse errors for programmatic handling.
///
/// Each variant contains minimal data needed for programmatic decisions.
/// The human-readable message lives in `GraphQLParseError::message()`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphQLParseErrorKind {
    /// Expected specific token(s) but found something else.
    ///
    /// ```text
    /// query { user(id "1") }
    ///                 ^^^ expected `:`, found `"1"`
    /// ```
    #[error("unexpected token: `{found}`")]
    UnexpectedToken {
        expected: Vec<String>,
        found: String,
    },

    /// The document ended before a complete construct was parsed.
    #[error("unexpected end of input")]
    UnexpectedEof {
        expected: Vec<String>,
    },

    /// The lexer could not produce a token (bad character, unterminated
    /// string, malformed number, ...).
    #[error("lexer error")]
    LexerError,

    /// A delimiter was opened but the input ended before it was closed.
    #[error("unclosed delimiter: `{delimiter}`")]
    UnclosedDelimiter {
        delimiter: String,
    },

    /// A literal could not be converted to a value (e.g. integer overflow).
    #[error("invalid value")]
    InvalidValue,

    /// A reserved name was used where it is not allowed (e.g. a fragment
    /// named `on`).
    #[error("reserved name: `{name}`")]
    ReservedName {
        name: String,
    },

    /// An empty `{}` selection set or `()` argument/variable list.
    #[error("empty {construct}")]
    InvalidEmptyConstruct {
        construct: String,
    },

    /// An executable document contained no operation definition.
    #[error("missing operation")]
    MissingOperation,

    /// A syntactically recognised definition the engine does not support.
    #[error("unsupported definition: `{definition}`")]
    UnsupportedDefinition {
        definition: String,
    },

    /// Selection sets, values or type annotations nested too deeply.
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,
}
