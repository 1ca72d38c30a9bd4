//! Tests for parsing operations, fragments and selections.

use crate::ast;
use crate::tests::utils::field_at;
use crate::tests::utils::parse_ok;
use crate::tests::utils::single_operation;

#[test]
fn parses_shorthand_query() {
    let op = single_operation("{ name }");

    assert_eq!(op.kind, ast::OperationKind::Query);
    assert!(op.name.is_none());
    assert!(op.is_shorthand());
    assert_eq!(field_at(&op.selection_set, 0).name, "name");
}

/// Variable definitions keep their declared types and constant defaults.
#[test]
fn parses_named_query_with_variables() {
    let op = single_operation(
        r#"query GetUser($id: ID! = "1", $tags: [String!]) { user(id: $id) { name } }"#,
    );

    assert_eq!(op.name.as_deref(), Some("GetUser"));
    assert_eq!(op.variable_definitions.len(), 2);

    let id = &op.variable_definitions[0];
    assert_eq!(id.name, "id");
    assert_eq!(id.var_type.to_string(), "ID!");
    assert_eq!(id.default_value, Some(ast::Value::String("1".to_string())));

    let tags = &op.variable_definitions[1];
    assert_eq!(tags.var_type.to_string(), "[String!]");
    assert!(tags.var_type.is_nullable());
    assert_eq!(tags.var_type.innermost_name(), "String");
    assert!(tags.default_value.is_none());

    let user = field_at(&op.selection_set, 0);
    assert_eq!(user.arguments[0].name, "id");
    assert_eq!(user.arguments[0].value, ast::Value::Variable("id".to_string()));
}

#[test]
fn parses_mutation() {
    let op = single_operation("mutation Like { like(postId: 7) { likes } }");

    assert_eq!(op.kind, ast::OperationKind::Mutation);
    assert_eq!(op.name.as_deref(), Some("Like"));
}

#[test]
fn parses_aliases_arguments_and_directives() {
    let op = single_operation(
        "{ smallPic: pic(size: 64, crop: true) @include(if: $big) @skip(if: false) }",
    );
    let field = field_at(&op.selection_set, 0);

    assert_eq!(field.alias.as_deref(), Some("smallPic"));
    assert_eq!(field.name, "pic");
    assert_eq!(field.response_key(), "smallPic");
    assert_eq!(field.argument("size").map(|a| &a.value), Some(&ast::Value::Int(64)));
    assert_eq!(field.argument("crop").map(|a| &a.value), Some(&ast::Value::Boolean(true)));
    assert_eq!(field.directives.len(), 2);
    assert_eq!(field.directives[0].name, "include");
    assert_eq!(
        field.directives[0].argument("if").map(|a| &a.value),
        Some(&ast::Value::Variable("big".to_string())),
    );
    assert!(field.selection_set.is_none());
}

/// `...Name` is a spread; `... on T`, `... @dir` and `... {` are inline
/// fragments.
#[test]
fn distinguishes_spreads_from_inline_fragments() {
    let op = single_operation(
        "{ node { ...NodeParts ... on User { name } ... @include(if: true) { id } ... { kind } } }",
    );
    let node = field_at(&op.selection_set, 0);
    let items = &node.selection_set.as_ref().map(|s| s.items.clone()).unwrap_or_default();

    assert!(matches!(
        &items[0],
        ast::Selection::FragmentSpread(spread) if spread.fragment_name == "NodeParts"
    ));
    assert!(matches!(
        &items[1],
        ast::Selection::InlineFragment(inline)
            if inline.type_condition.as_deref() == Some("User")
    ));
    assert!(matches!(
        &items[2],
        ast::Selection::InlineFragment(inline)
            if inline.type_condition.is_none() && inline.directives.len() == 1
    ));
    assert!(matches!(
        &items[3],
        ast::Selection::InlineFragment(inline) if inline.type_condition.is_none()
    ));
}

#[test]
fn parses_fragment_definitions() {
    let doc = parse_ok("{ ...F } fragment F on User @x { id }");
    let fragment = doc.fragment_named("F").cloned();

    let fragment = match fragment {
        Some(fragment) => fragment,
        None => panic!("fragment F not found"),
    };
    assert_eq!(fragment.type_condition, "User");
    assert_eq!(fragment.directives[0].name, "x");
    assert_eq!(field_at(&fragment.selection_set, 0).name, "id");
}

/// The parser accepts several anonymous operations; choosing among them is
/// an execution concern.
#[test]
fn allows_multiple_operations() {
    let doc = parse_ok("{ a } { b } query Named { c }");
    assert_eq!(doc.operations().count(), 3);
}

#[test]
fn parses_value_literals() {
    let op = single_operation(
        r#"{ f(a: null, b: -3, c: 2.5e1, d: "s", e: RED, g: [1, [2]], h: {x: 1, y: {z: []}}) }"#,
    );
    let values: Vec<_> = field_at(&op.selection_set, 0)
        .arguments
        .iter()
        .map(|arg| arg.value.clone())
        .collect();

    assert_eq!(
        values,
        vec![
            ast::Value::Null,
            ast::Value::Int(-3),
            ast::Value::Float(25.0),
            ast::Value::String("s".to_string()),
            ast::Value::Enum("RED".to_string()),
            ast::Value::List(vec![
                ast::Value::Int(1),
                ast::Value::List(vec![ast::Value::Int(2)]),
            ]),
            ast::Value::Object(vec![
                ("x".to_string(), ast::Value::Int(1)),
                (
                    "y".to_string(),
                    ast::Value::Object(vec![("z".to_string(), ast::Value::List(vec![]))]),
                ),
            ]),
        ],
    );
}

/// `true`, `false` and `null` are valid names outside value positions.
#[test]
fn keywords_are_names_outside_values() {
    let op = single_operation("{ true: null(false: true) }");
    let field = field_at(&op.selection_set, 0);

    assert_eq!(field.alias.as_deref(), Some("true"));
    assert_eq!(field.name, "null");
    assert_eq!(field.arguments[0].name, "false");
}

/// Positions are 1-based and point at each node's first token.
#[test]
fn records_positions() {
    let doc = parse_ok("query Q($v: Int) {\n  a\n  b: c(x: 1)\n  ...F\n}\nfragment F on T { d }");
    let op = doc.operations().next().cloned();
    let op = match op {
        Some(op) => op,
        None => panic!("missing operation"),
    };

    assert_eq!(op.position, ast::AstPos::new(1, 1));
    assert_eq!(op.variable_definitions[0].position, ast::AstPos::new(1, 9));
    assert_eq!(op.selection_set.position, ast::AstPos::new(1, 18));
    assert_eq!(op.selection_set.items[0].position(), ast::AstPos::new(2, 3));
    let aliased = field_at(&op.selection_set, 1);
    assert_eq!(aliased.position, ast::AstPos::new(3, 3));
    assert_eq!(aliased.arguments[0].position, ast::AstPos::new(3, 8));
    assert_eq!(op.selection_set.items[2].position(), ast::AstPos::new(4, 3));
    assert_eq!(
        doc.fragment_named("F").map(|f| f.position),
        Some(ast::AstPos::new(6, 1)),
    );
}
