
use crate::schema::Schema;
use crate::schema::SchemaBuilder;

const TEST_SDL: &str = r#"
type Query {
  user(id: ID!): User
  users(first: Int = 10, role: String): [User!]!
  widget: Widget
  search(text: String!): [SearchResult!]!
  ok: Boolean
}

type Mutation {
  rename(id: ID!, name: String!): User
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
  friends: [User!]!
}

type Post {
  title: String
}

union SearchResult = User | Post
"#;

fn test_schema() -> Schema {
    SchemaBuilder::from_str(TEST_SDL).unwrap().build().unwrap()
}
