use criterion::Criterion;
use criterion::Throughput;
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use gqlengine_parser::GraphQLParser;
use gqlengine_parser::token_source::StrGraphQLTokenSource;

const SCHEMA: &str = r#"
"""
Entry points.
"""
type Query {
  user(id: ID!): User
  search(text: String!, first: Int = 10): [SearchResult!]!
  node(id: ID!): Node
}

interface Node { id: ID! }

type User implements Node {
  id: ID!
  name: String!
  friends(first: Int = 10): [User!]!
  posts: [Post!]!
}

type Post implements Node {
  id: ID!
  title: String!
  author: User!
}

union SearchResult = User | Post
"#;

const QUERY: &str = r#"
query Dashboard($id: ID!, $first: Int = 5, $withPosts: Boolean!) {
  user(id: $id) {
    ...UserParts
    friends(first: $first) {
      ...UserParts
      posts @include(if: $withPosts) { id title }
    }
  }
  search(text: "graph", first: 20) {
    __typename
    ... on User { name }
    ... on Post { title author { name } }
  }
}

fragment UserParts on User {
  id
  name
}
"#;

/// A synthetic document of `count` sibling fields, each with arguments and a
/// nested selection set.
fn wide_query(count: usize) -> String {
    let mut source = String::from("query Wide {\n");
    for idx in 0..count {
        source.push_str(&format!(
            "  f{idx}: field(id: {idx}, tags: [\"a\", \"b\"], filter: {{ min: 1.5 }}) {{ id name }}\n",
        ));
    }
    source.push('}');
    source
}

fn lexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("lex");
    group.throughput(Throughput::Bytes(QUERY.len() as u64));
    group.bench_function("query", |b| {
        b.iter(|| black_box(StrGraphQLTokenSource::new(QUERY).count()))
    });
    group.finish();
}

fn parsing(c: &mut Criterion) {
    let wide = wide_query(500);

    let mut group = c.benchmark_group("parse");
    group.bench_function("schema", |b| {
        b.iter(|| black_box(GraphQLParser::new(SCHEMA).parse_schema_document()))
    });
    group.bench_function("query", |b| {
        b.iter(|| black_box(GraphQLParser::new(QUERY).parse_executable_document()))
    });
    group.throughput(Throughput::Bytes(wide.len() as u64));
    group.bench_function("wide query (500 fields)", |b| {
        b.iter(|| black_box(GraphQLParser::new(&wide).parse_executable_document()))
    });
    group.finish();
}

criterion_group!(benches, lexing, parsing);
criterion_main!(benches);
