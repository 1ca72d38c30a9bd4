mod executor_tests;

use crate::object;
use crate::resolver::sync_resolver;
use crate::resolver::FieldValue;
use crate::resolver::ObjectValue;
use crate::resolver::ResolverError;
use crate::schema::SchemaBuilder;
use crate::Value;
use indexmap::IndexMap;

const TEST_SDL: &str = r#"
type Query {
  user(id: ID!): User
  users: [User]
  strictUsers: [User!]
  widget: Widget
  search(text: String!): [SearchResult!]!
  greeting(name: String = "world"): String!
  count(n: Int): Int
  ids(values: [ID!]): [ID!]
  failing: String
  required: String!
  scores: [Int]
  slow: String
  fast: String
}

type Mutation {
  increment(by: Int = 1): Int!
}

interface Widget {
  id: ID!
}

type Sprocket implements Widget {
  id: ID!
  teeth: Int
}

type Gadget implements Widget {
  id: ID!
  power: Int
}

type User {
  id: ID!
  name: String
  email: String!
  friends: [User!]!
}

type Post {
  title: String
}

union SearchResult = User | Post
"#;

fn ann() -> ObjectValue {
    object! {
        id: "1",
        name: "Ann",
        email: "ann@example.com",
        friends: vec![bo()],
    }
}

fn bo() -> ObjectValue {
    object! {
        id: "2",
        name: "Bo",
        email: "bo@example.com",
        friends: Vec::<ObjectValue>::new(),
    }
}

/// A user without the non-null `email`.
fn cy() -> ObjectValue {
    object! {
        id: "3",
        name: "Cy",
        friends: Vec::<ObjectValue>::new(),
    }
}

/// The test schema with its query resolvers bound; tests add their own
/// bindings before building.
fn schema_builder() -> SchemaBuilder {
    SchemaBuilder::from_str(TEST_SDL)
        .unwrap()
        .resolver(
            "Query",
            "user",
            sync_resolver(|ctx| {
                Ok(match ctx.argument("id").and_then(Value::as_str) {
                    Some("1") => ann().into(),
                    Some("2") => bo().into(),
                    Some("3") => cy().into(),
                    _ => FieldValue::Null,
                })
            }),
        )
        .resolver(
            "Query",
            "greeting",
            sync_resolver(|ctx| {
                let name = ctx
                    .argument("name")
                    .and_then(Value::as_str)
                    .unwrap_or("nobody");
                Ok(FieldValue::from(format!("Hello, {name}!")))
            }),
        )
        .resolver(
            "Query",
            "count",
            sync_resolver(|ctx| Ok(ctx.argument("n").cloned().map(FieldValue::from).unwrap_or_default())),
        )
        .resolver(
            "Query",
            "ids",
            sync_resolver(|ctx| Ok(ctx.argument("values").cloned().map(FieldValue::from).unwrap_or_default())),
        )
        .resolver("Query", "failing", sync_resolver(|_| Err(ResolverError::new("boom"))))
}

/// The root value: list and abstract fields read from here.
fn root() -> FieldValue {
    FieldValue::from(object! {
        users: vec![ann(), bo(), cy()],
        strictUsers: vec![ann(), bo(), cy()],
        widget: object! { id: "w1", teeth: 12 }.with_type_name("Sprocket"),
        search: vec![
            ann().with_type_name("User"),
            object! { title: "Hello" }.with_type_name("Post"),
        ],
        scores: vec![FieldValue::from(1), FieldValue::from(2), FieldValue::from("x")],
    })
}

fn variables(json: serde_json::Value) -> IndexMap<String, Value> {
    serde_json::from_value(json).unwrap()
}
