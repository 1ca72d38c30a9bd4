//! A [`GraphQLTokenSource`](crate::token_source::GraphQLTokenSource) that
//! lexes from a `&str` input.
//!
//! Names and numbers borrow directly from the source string using
//! `Cow::Borrowed`; string literals are only copied when they contain escape
//! sequences or are block strings.
//!
//! # Usage
//!
//! ```rust
//! use gqlengine_parser::token::GraphQLTokenKind;
//! use gqlengine_parser::token_source::StrGraphQLTokenSource;
//!
//! let kinds: Vec<_> = StrGraphQLTokenSource::new("{ name }")
//!     .map(|token| token.kind)
//!     .collect();
//! assert_eq!(kinds, vec![
//!     GraphQLTokenKind::CurlyBraceOpen,
//!     GraphQLTokenKind::name_borrowed("name"),
//!     GraphQLTokenKind::CurlyBraceClose,
//!     GraphQLTokenKind::Eof,
//! ]);
//! ```

use crate::token::GraphQLToken;
use crate::token::GraphQLTokenKind;
use crate::GraphQLSourceSpan;
use crate::SourcePosition;
use std::borrow::Cow;
use std::path::Path;

/// A token source that lexes from a string slice.
///
/// Whitespace, commas, the BOM and `#` comments are ignored tokens and are
/// skipped. Invalid input produces a single `GraphQLTokenKind::Error` token;
/// the parser stops at the first one.
pub struct StrGraphQLTokenSource<'src> {
    /// The full source text being lexed.
    source: &'src str,

    /// Current byte offset from the start of `source`.
    curr_byte_offset: usize,

    /// Current 0-based line number.
    curr_line: usize,

    /// Current character column (0-based).
    curr_col: usize,

    /// Whether the previous character was `\r`, so that `\r\n` counts as a
    /// single line terminator.
    last_char_was_cr: bool,

    /// Whether the EOF token has been emitted.
    finished: bool,

    /// Optional file path included in every span.
    file_path: Option<&'src Path>,
}

impl<'src> StrGraphQLTokenSource<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            curr_byte_offset: 0,
            curr_line: 0,
            curr_col: 0,
            last_char_was_cr: false,
            finished: false,
            file_path: None,
        }
    }

    /// Creates a new token source whose spans carry `path`.
    pub fn with_file_path(source: &'src str, path: &'src Path) -> Self {
        Self {
            file_path: Some(path),
            ..Self::new(source)
        }
    }

    // =========================================================================
    // Position and scanning helpers
    // =========================================================================

    fn remaining(&self) -> &'src str {
        &self.source[self.curr_byte_offset..]
    }

    fn curr_position(&self) -> SourcePosition {
        SourcePosition::new(self.curr_line, self.curr_col, self.curr_byte_offset)
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_char_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consumes the next character and updates position tracking.
    fn consume(&mut self) -> Option<char> {
        let ch = self.peek_char()?;

        if ch == '\n' {
            if self.last_char_was_cr {
                // Second half of `\r\n`: the line was already counted.
                self.last_char_was_cr = false;
            } else {
                self.curr_line += 1;
                self.curr_col = 0;
            }
        } else if ch == '\r' {
            self.curr_line += 1;
            self.curr_col = 0;
            self.last_char_was_cr = true;
        } else {
            self.curr_col += 1;
            self.last_char_was_cr = false;
        }

        self.curr_byte_offset += ch.len_utf8();
        Some(ch)
    }

    /// Advances over `byte_len` bytes known to contain no line terminators.
    fn advance_within_line(&mut self, byte_len: usize) {
        let end = self.curr_byte_offset + byte_len;
        self.curr_col += self.source[self.curr_byte_offset..end].chars().count();
        self.curr_byte_offset = end;
        self.last_char_was_cr = false;
    }

    fn make_span(&self, start: SourcePosition) -> GraphQLSourceSpan {
        GraphQLSourceSpan::new(start, self.curr_position()).in_file(self.file_path)
    }

    fn make_token(
        &self,
        kind: GraphQLTokenKind<'src>,
        start: SourcePosition,
    ) -> GraphQLToken<'src> {
        GraphQLToken::new(kind, self.make_span(start))
    }

    fn punctuator(
        &mut self,
        kind: GraphQLTokenKind<'src>,
        start: SourcePosition,
    ) -> GraphQLToken<'src> {
        self.consume();
        self.make_token(kind, start)
    }

    // =========================================================================
    // Lexer main loop
    // =========================================================================

    fn next_token(&mut self) -> GraphQLToken<'src> {
        self.skip_ignored();
        let start = self.curr_position();

        match self.peek_char() {
            None => self.make_token(GraphQLTokenKind::Eof, start),

            Some('!') => self.punctuator(GraphQLTokenKind::Bang, start),
            Some('$') => self.punctuator(GraphQLTokenKind::Dollar, start),
            Some('&') => self.punctuator(GraphQLTokenKind::Ampersand, start),
            Some('(') => self.punctuator(GraphQLTokenKind::ParenOpen, start),
            Some(')') => self.punctuator(GraphQLTokenKind::ParenClose, start),
            Some(':') => self.punctuator(GraphQLTokenKind::Colon, start),
            Some('=') => self.punctuator(GraphQLTokenKind::Equals, start),
            Some('@') => self.punctuator(GraphQLTokenKind::At, start),
            Some('[') => self.punctuator(GraphQLTokenKind::SquareBracketOpen, start),
            Some(']') => self.punctuator(GraphQLTokenKind::SquareBracketClose, start),
            Some('{') => self.punctuator(GraphQLTokenKind::CurlyBraceOpen, start),
            Some('}') => self.punctuator(GraphQLTokenKind::CurlyBraceClose, start),
            Some('|') => self.punctuator(GraphQLTokenKind::Pipe, start),

            Some('.') => self.lex_ellipsis(start),
            Some('"') => self.lex_string(start),
            Some(c) if is_name_start(c) => self.lex_name(start),
            Some(c) if c == '-' || c.is_ascii_digit() => self.lex_number(start),

            Some(c) => {
                self.consume();
                self.make_token(
                    GraphQLTokenKind::error(format!(
                        "Unexpected character `{}`",
                        c.escape_debug(),
                    )),
                    start,
                )
            },
        }
    }

    /// Skips whitespace, line terminators, commas, the BOM, and comments.
    fn skip_ignored(&mut self) {
        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' | '\t' | '\n' | '\r' | ',' | '\u{FEFF}' => {
                    self.consume();
                },
                '#' => {
                    let bytes = self.remaining().as_bytes();
                    let comment_len = memchr::memchr2(b'\n', b'\r', bytes)
                        .unwrap_or(bytes.len());
                    self.advance_within_line(comment_len);
                },
                _ => break,
            }
        }
    }

    /// Lexes `...`. Anything other than three adjacent dots is an error.
    fn lex_ellipsis(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        if self.remaining().starts_with("...") {
            self.advance_within_line(3);
            return self.make_token(GraphQLTokenKind::Ellipsis, start);
        }

        let message = if self.remaining().starts_with("..") {
            self.advance_within_line(2);
            "Unexpected `..` (use `...` for spread operator)"
        } else {
            self.advance_within_line(1);
            "Unexpected `.`"
        };
        self.make_token(GraphQLTokenKind::error(message), start)
    }

    /// Lexes a name or keyword.
    ///
    /// Names match the pattern: `/[_A-Za-z][_0-9A-Za-z]*/`
    fn lex_name(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let name_start = self.curr_byte_offset;
        let name_len = self
            .remaining()
            .bytes()
            .take_while(|b| is_name_continue(*b as char))
            .count();
        self.advance_within_line(name_len);
        let name = &self.source[name_start..self.curr_byte_offset];

        let kind = match name {
            "true" => GraphQLTokenKind::True,
            "false" => GraphQLTokenKind::False,
            "null" => GraphQLTokenKind::Null,
            _ => GraphQLTokenKind::name_borrowed(name),
        };
        self.make_token(kind, start)
    }

    /// Lexes an integer or float literal.
    ///
    /// - Optional negative sign: `-`
    /// - Integer part: `0` or `[1-9][0-9]*`
    /// - Optional fraction: `.[0-9]+`
    /// - Optional exponent: `[eE][+-]?[0-9]+`
    fn lex_number(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let num_start = self.curr_byte_offset;
        let mut is_float = false;

        if self.peek_char() == Some('-') {
            self.consume();
        }

        match self.peek_char() {
            Some('0') => {
                self.consume();
                if matches!(self.peek_char(), Some(ch) if ch.is_ascii_digit()) {
                    return self.lex_number_error(
                        start,
                        num_start,
                        "Invalid number: leading zeros are not allowed",
                    );
                }
            },
            Some(ch) if ch.is_ascii_digit() => self.consume_digits(),
            _ => {
                return self.make_token(GraphQLTokenKind::error("Unexpected `-`"), start);
            },
        }

        if self.peek_char() == Some('.') {
            if !matches!(self.peek_char_nth(1), Some(ch) if ch.is_ascii_digit()) {
                return self.lex_number_error(
                    start,
                    num_start,
                    "Invalid number: expected digit after `.`",
                );
            }
            is_float = true;
            self.consume();
            self.consume_digits();
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            is_float = true;
            self.consume();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.consume();
            }
            if !matches!(self.peek_char(), Some(ch) if ch.is_ascii_digit()) {
                return self.lex_number_error(
                    start,
                    num_start,
                    "Invalid number: exponent must have at least one digit",
                );
            }
            self.consume_digits();
        }

        // `123abc` and `1.5.2` are not two tokens.
        if matches!(self.peek_char(), Some(ch) if is_name_start(ch) || ch == '.') {
            return self.lex_number_error(
                start,
                num_start,
                "Invalid number: unexpected character after number",
            );
        }

        let num_text = &self.source[num_start..self.curr_byte_offset];
        let kind = if is_float {
            GraphQLTokenKind::FloatValue(Cow::Borrowed(num_text))
        } else {
            GraphQLTokenKind::IntValue(Cow::Borrowed(num_text))
        };
        self.make_token(kind, start)
    }

    fn consume_digits(&mut self) {
        while matches!(self.peek_char(), Some(ch) if ch.is_ascii_digit()) {
            self.consume();
        }
    }

    fn lex_number_error(
        &mut self,
        start: SourcePosition,
        num_start: usize,
        message: &str,
    ) -> GraphQLToken<'src> {
        // Swallow the rest of the number-like run so the span covers it.
        while matches!(
            self.peek_char(),
            Some(ch) if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '+' | '-' | '_')
        ) {
            self.consume();
        }
        let invalid_text = &self.source[num_start..self.curr_byte_offset];
        self.make_token(
            GraphQLTokenKind::error(format!("{message}: `{invalid_text}`")),
            start,
        )
    }

    // =========================================================================
    // String lexing
    // =========================================================================

    fn lex_string(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        if self.remaining().starts_with("\"\"\"") {
            return self.lex_block_string(start);
        }

        self.consume(); // opening "
        let content_start = self.curr_byte_offset;
        let mut cooked: Option<String> = None;

        loop {
            match self.peek_char() {
                None | Some('\n') | Some('\r') => {
                    return self.make_token(
                        GraphQLTokenKind::error("Unterminated string literal"),
                        start,
                    );
                },
                Some('"') => {
                    let content_end = self.curr_byte_offset;
                    self.consume();
                    let value = match cooked {
                        Some(value) => Cow::Owned(value),
                        None => Cow::Borrowed(&self.source[content_start..content_end]),
                    };
                    return self.make_token(GraphQLTokenKind::StringValue(value), start);
                },
                Some('\\') => {
                    let escape_start = self.curr_byte_offset;
                    let value = cooked.get_or_insert_with(
                        || self.source[content_start..escape_start].to_string(),
                    );
                    self.consume();
                    let escaped = match self.consume() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => match self.lex_unicode_escape() {
                            Some(ch) => ch,
                            None => {
                                return self.make_token(
                                    GraphQLTokenKind::error("Invalid Unicode escape sequence"),
                                    start,
                                );
                            },
                        },
                        Some(other) => {
                            return self.make_token(
                                GraphQLTokenKind::error(format!(
                                    "Invalid escape sequence `\\{}`",
                                    other.escape_debug(),
                                )),
                                start,
                            );
                        },
                        None => {
                            return self.make_token(
                                GraphQLTokenKind::error("Unterminated string literal"),
                                start,
                            );
                        },
                    };
                    value.push(escaped);
                },
                Some(ch) => {
                    self.consume();
                    if let Some(value) = cooked.as_mut() {
                        value.push(ch);
                    }
                },
            }
        }
    }

    /// Reads the `XXXX` of a `\uXXXX` escape (the `\u` is already consumed),
    /// combining a following low surrogate escape when needed.
    fn lex_unicode_escape(&mut self) -> Option<char> {
        let high = self.lex_hex4()?;
        if !(0xD800..=0xDBFF).contains(&high) {
            return char::from_u32(high);
        }

        if !self.remaining().starts_with("\\u") {
            return None;
        }
        self.advance_within_line(2);
        let low = self.lex_hex4()?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return None;
        }
        char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
    }

    fn lex_hex4(&mut self) -> Option<u32> {
        let hex = self.remaining().get(..4)?;
        let value = u32::from_str_radix(hex, 16).ok()?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        self.advance_within_line(4);
        Some(value)
    }

    /// Lexes a `"""block string"""`, applying the common-indentation removal
    /// of the GraphQL `BlockStringValue()` algorithm.
    fn lex_block_string(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        self.advance_within_line(3);
        let mut raw = String::new();

        loop {
            if self.remaining().starts_with("\\\"\"\"") {
                self.advance_within_line(4);
                raw.push_str("\"\"\"");
                continue;
            }
            if self.remaining().starts_with("\"\"\"") {
                self.advance_within_line(3);
                return self.make_token(
                    GraphQLTokenKind::StringValue(Cow::Owned(block_string_value(&raw))),
                    start,
                );
            }
            match self.consume() {
                Some(ch) => raw.push(ch),
                None => {
                    return self.make_token(
                        GraphQLTokenKind::error("Unterminated block string"),
                        start,
                    );
                },
            }
        }
    }
}

impl<'src> Iterator for StrGraphQLTokenSource<'src> {
    type Item = GraphQLToken<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if matches!(token.kind, GraphQLTokenKind::Eof) {
            self.finished = true;
        }
        Some(token)
    }
}

fn is_name_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

fn is_name_continue(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

/// Computes the value of a block string from its raw contents.
///
/// See <https://spec.graphql.org/October2021/#BlockStringValue()>.
pub(crate) fn block_string_value(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<&str> = normalized.split('\n').collect();

    let common_indent = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
            (indent < line.len()).then_some(indent)
        })
        .min();

    let mut dedented: Vec<String> = Vec::with_capacity(lines.len());
    for (idx, line) in lines.drain(..).enumerate() {
        match common_indent {
            Some(indent) if idx > 0 => dedented.push(line.get(indent..).unwrap_or("").to_string()),
            _ => dedented.push(line.to_string()),
        }
    }

    let is_blank = |line: &String| line.chars().all(|ch| ch == ' ' || ch == '\t');
    while dedented.first().is_some_and(is_blank) {
        dedented.remove(0);
    }
    while dedented.last().is_some_and(is_blank) {
        dedented.pop();
    }

    dedented.join("\n")
}
