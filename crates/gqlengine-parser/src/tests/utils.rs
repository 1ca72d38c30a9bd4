//! Various test utils.

use crate::ast;
use crate::parse_executable_document;
use crate::token::GraphQLTokenKind;
use crate::token_source::StrGraphQLTokenSource;
use crate::GraphQLParseError;

/// Lexes `source` and returns every token kind, including the final `Eof`.
pub(super) fn token_kinds(source: &str) -> Vec<GraphQLTokenKind<'_>> {
    StrGraphQLTokenSource::new(source)
        .map(|token| token.kind)
        .collect()
}

pub(super) fn parse_ok(source: &str) -> ast::Document {
    match parse_executable_document(source) {
        Ok(doc) => doc,
        Err(err) => panic!("failed to parse {source:?}: {}", err.format_detailed(Some(source))),
    }
}

pub(super) fn parse_err(source: &str) -> GraphQLParseError {
    match parse_executable_document(source) {
        Ok(doc) => panic!("expected a parse error for {source:?}, got {doc:?}"),
        Err(err) => err,
    }
}

/// Returns the only operation in `source`.
pub(super) fn single_operation(source: &str) -> ast::OperationDefinition {
    let doc = parse_ok(source);
    let mut operations = doc.operations().cloned().collect::<Vec<_>>();
    assert_eq!(operations.len(), 1, "expected exactly one operation");
    operations.remove(0)
}

pub(super) fn field_at(selection_set: &ast::SelectionSet, idx: usize) -> &ast::Field {
    match &selection_set.items[idx] {
        ast::Selection::Field(field) => field,
        other => panic!("expected a field at index {idx}, got {other:?}"),
    }
}

/// Resets every position in `doc` to `AstPos::default()` so that documents
/// parsed from differently formatted text can be compared.
pub(super) fn strip_positions(doc: &mut ast::Document) {
    for definition in &mut doc.definitions {
        match definition {
            ast::Definition::Operation(op) => {
                op.position = ast::AstPos::default();
                for var_def in &mut op.variable_definitions {
                    var_def.position = ast::AstPos::default();
                }
                strip_directives(&mut op.directives);
                strip_selection_set(&mut op.selection_set);
            },
            ast::Definition::Fragment(frag) => {
                frag.position = ast::AstPos::default();
                strip_directives(&mut frag.directives);
                strip_selection_set(&mut frag.selection_set);
            },
        }
    }
}

fn strip_selection_set(selection_set: &mut ast::SelectionSet) {
    selection_set.position = ast::AstPos::default();
    for item in &mut selection_set.items {
        match item {
            ast::Selection::Field(field) => {
                field.position = ast::AstPos::default();
                strip_arguments(&mut field.arguments);
                strip_directives(&mut field.directives);
                if let Some(nested) = &mut field.selection_set {
                    strip_selection_set(nested);
                }
            },
            ast::Selection::FragmentSpread(spread) => {
                spread.position = ast::AstPos::default();
                strip_directives(&mut spread.directives);
            },
            ast::Selection::InlineFragment(inline) => {
                inline.position = ast::AstPos::default();
                strip_directives(&mut inline.directives);
                strip_selection_set(&mut inline.selection_set);
            },
        }
    }
}

fn strip_directives(directives: &mut [ast::Directive]) {
    for directive in directives {
        directive.position = ast::AstPos::default();
        strip_arguments(&mut directive.arguments);
    }
}

fn strip_arguments(arguments: &mut [ast::Argument]) {
    for argument in arguments {
        argument.position = ast::AstPos::default();
    }
}
