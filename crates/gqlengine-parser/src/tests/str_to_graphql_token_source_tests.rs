//! Tests for the `&str` lexer.

use crate::tests::utils::token_kinds;
use crate::token::GraphQLTokenKind;
use crate::token_source::StrGraphQLTokenSource;
use std::borrow::Cow;

fn single_token(source: &str) -> GraphQLTokenKind<'_> {
    let mut kinds = token_kinds(source);
    assert_eq!(kinds.len(), 2, "expected one token plus Eof, got {kinds:?}");
    assert_eq!(kinds[1], GraphQLTokenKind::Eof);
    kinds.remove(0)
}

fn assert_error_token(source: &str, expected_fragment: &str) {
    let kinds = token_kinds(source);
    let message = kinds.iter().find_map(|kind| match kind {
        GraphQLTokenKind::Error { message } => Some(message.clone()),
        _ => None,
    });
    match message {
        Some(message) => assert!(
            message.contains(expected_fragment),
            "error `{message}` does not mention `{expected_fragment}`",
        ),
        None => panic!("expected an error token for {source:?}, got {kinds:?}"),
    }
}

/// Punctuators, names and keywords lex into their dedicated kinds; commas
/// and whitespace are ignored.
#[test]
fn lexes_punctuators_and_names() {
    assert_eq!(
        token_kinds("query Q($a: [Int!]) @x { ...F, ... on T | & = }"),
        vec![
            GraphQLTokenKind::name_borrowed("query"),
            GraphQLTokenKind::name_borrowed("Q"),
            GraphQLTokenKind::ParenOpen,
            GraphQLTokenKind::Dollar,
            GraphQLTokenKind::name_borrowed("a"),
            GraphQLTokenKind::Colon,
            GraphQLTokenKind::SquareBracketOpen,
            GraphQLTokenKind::name_borrowed("Int"),
            GraphQLTokenKind::Bang,
            GraphQLTokenKind::SquareBracketClose,
            GraphQLTokenKind::ParenClose,
            GraphQLTokenKind::At,
            GraphQLTokenKind::name_borrowed("x"),
            GraphQLTokenKind::CurlyBraceOpen,
            GraphQLTokenKind::Ellipsis,
            GraphQLTokenKind::name_borrowed("F"),
            GraphQLTokenKind::Ellipsis,
            GraphQLTokenKind::name_borrowed("on"),
            GraphQLTokenKind::name_borrowed("T"),
            GraphQLTokenKind::Pipe,
            GraphQLTokenKind::Ampersand,
            GraphQLTokenKind::Equals,
            GraphQLTokenKind::CurlyBraceClose,
            GraphQLTokenKind::Eof,
        ],
    );
}

#[test]
fn lexes_boolean_and_null_keywords() {
    assert_eq!(
        token_kinds("true false null"),
        vec![
            GraphQLTokenKind::True,
            GraphQLTokenKind::False,
            GraphQLTokenKind::Null,
            GraphQLTokenKind::Eof,
        ],
    );
}

/// Comments run to the end of the line and the BOM is ignored.
#[test]
fn skips_comments_and_bom() {
    assert_eq!(
        token_kinds("\u{FEFF}# a comment, with { punctuation\n{ a } # trailing"),
        vec![
            GraphQLTokenKind::CurlyBraceOpen,
            GraphQLTokenKind::name_borrowed("a"),
            GraphQLTokenKind::CurlyBraceClose,
            GraphQLTokenKind::Eof,
        ],
    );
}

#[test]
fn lexes_numbers() {
    assert_eq!(
        token_kinds("0 -12 3.5 1e10 -2.5E-3"),
        vec![
            GraphQLTokenKind::IntValue(Cow::Borrowed("0")),
            GraphQLTokenKind::IntValue(Cow::Borrowed("-12")),
            GraphQLTokenKind::FloatValue(Cow::Borrowed("3.5")),
            GraphQLTokenKind::FloatValue(Cow::Borrowed("1e10")),
            GraphQLTokenKind::FloatValue(Cow::Borrowed("-2.5E-3")),
            GraphQLTokenKind::Eof,
        ],
    );
}

#[test]
fn rejects_malformed_numbers() {
    assert_error_token("007", "leading zeros");
    assert_error_token("1.", "expected digit after `.`");
    assert_error_token("1e", "exponent");
    assert_error_token("123abc", "unexpected character after number");
    assert_error_token("-", "Unexpected `-`");
}

/// Strings without escapes borrow from the source; escapes are cooked.
#[test]
fn lexes_strings_with_escapes() {
    assert_eq!(
        single_token(r#""plain""#),
        GraphQLTokenKind::StringValue(Cow::Borrowed("plain")),
    );
    assert!(matches!(
        single_token(r#""plain""#),
        GraphQLTokenKind::StringValue(Cow::Borrowed(_)),
    ));
    assert_eq!(
        single_token(r#""a\"b\\c\/d\n\t\u0041""#),
        GraphQLTokenKind::StringValue(Cow::Owned("a\"b\\c/d\n\tA".to_string())),
    );
}

#[test]
fn combines_surrogate_pair_escapes() {
    assert_eq!(
        single_token(r#""\uD83D\uDE00""#),
        GraphQLTokenKind::StringValue(Cow::Owned("\u{1F600}".to_string())),
    );
}

#[test]
fn rejects_bad_strings() {
    assert_error_token("\"never closed", "Unterminated string");
    assert_error_token("\"line\nbreak\"", "Unterminated string");
    assert_error_token(r#""\q""#, "Invalid escape sequence");
    assert_error_token(r#""\u12""#, "Invalid Unicode escape");
    assert_error_token(r#""\uD83D""#, "Invalid Unicode escape");
}

/// Block strings drop the common indentation and the leading/trailing blank
/// lines.
#[test]
fn lexes_block_strings() {
    let source = "\"\"\"\n    Hello,\n      World!\n\n    Bye \\\"\"\"\n  \"\"\"";
    assert_eq!(
        single_token(source),
        GraphQLTokenKind::StringValue(Cow::Owned(
            "Hello,\n  World!\n\nBye \"\"\"".to_string(),
        )),
    );
}

#[test]
fn rejects_unterminated_block_string() {
    assert_error_token("\"\"\" open", "Unterminated block string");
}

#[test]
fn rejects_stray_dots_and_characters() {
    assert_error_token("..", "use `...`");
    assert_error_token(".", "Unexpected `.`");
    assert_error_token("{ a ^ }", "Unexpected character `^`");
}

/// Spans carry 0-based lines and character columns; `\r\n` is a single line
/// terminator.
#[test]
fn tracks_positions_across_line_terminators() {
    let tokens: Vec<_> = StrGraphQLTokenSource::new("{\r\n  name\n}").collect();
    let name = &tokens[1];
    assert_eq!(name.kind, GraphQLTokenKind::name_borrowed("name"));
    assert_eq!(name.span.start_inclusive.line(), 1);
    assert_eq!(name.span.start_inclusive.col(), 2);
    assert_eq!(name.span.start_inclusive.byte_offset(), 5);
    assert_eq!(name.span.end_exclusive.col(), 6);

    let close = &tokens[2];
    assert_eq!(close.span.start_inclusive.line(), 2);
    assert_eq!(close.span.start_inclusive.col(), 0);
}

/// Columns count characters, not bytes.
#[test]
fn columns_count_characters() {
    let tokens: Vec<_> = StrGraphQLTokenSource::new("\"héllo\" x").collect();
    assert_eq!(tokens[1].span.start_inclusive.col(), 8);
    assert_eq!(tokens[1].span.start_inclusive.byte_offset(), 9);
}

/// The iterator stops after emitting `Eof`.
#[test]
fn stops_after_eof() {
    let mut source = StrGraphQLTokenSource::new("a");
    assert!(source.next().is_some());
    assert_eq!(source.next().map(|t| t.kind), Some(GraphQLTokenKind::Eof));
    assert!(source.next().is_none());
}
