//! Request and response types, serialized the way GraphQL responses are
//! carried over the wire.

use crate::Value;
use gqlengine_parser::ast::AstPos;
use gqlengine_parser::GraphQLParseError;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;
use std::fmt;
use thiserror::Error;

/// A request to execute: document text, the operation to run and the
/// supplied variable values.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, Value>,
}

impl Request {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}

/// The result of executing one request.
///
/// `data` is `None` when the operation was not executed (parse, validation
/// or variable errors) or when a null propagated to the root; such a response
/// always carries at least one error.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Response {
    pub data: Option<ResultNode>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<LocatedError>,
}

impl Response {
    pub(crate) fn from_errors(errors: Vec<LocatedError>) -> Self {
        Self { data: None, errors }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A node of the result tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ResultNode {
    #[default]
    Null,
    Scalar(Value),
    List(Vec<ResultNode>),
    Object(IndexMap<String, ResultNode>),
}

impl ResultNode {
    pub fn is_null(&self) -> bool {
        matches!(self, ResultNode::Null)
    }

    pub fn get(&self, key: &str) -> Option<&ResultNode> {
        match self {
            ResultNode::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ResultNode::Null => serde_json::Value::Null,
            ResultNode::Scalar(value) => value.to_json(),
            ResultNode::List(items) => {
                serde_json::Value::Array(items.iter().map(ResultNode::to_json).collect())
            },
            ResultNode::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, node)| (key.clone(), node.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ResultNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResultNode::Null => serializer.serialize_unit(),
            ResultNode::Scalar(value) => value.serialize(serializer),
            ResultNode::List(items) => items.serialize(serializer),
            ResultNode::Object(map) => map.serialize(serializer),
        }
    }
}

/// A line/column pair in the request document, both 1-based.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<AstPos> for Location {
    fn from(pos: AstPos) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

impl From<&AstPos> for Location {
    fn from(pos: &AstPos) -> Self {
        Location::from(*pos)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One step of a response path: a response key or a list index.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// An error reported in a [`Response`], attributed to the response path it
/// concerns (empty for document-level errors) and the document locations it
/// originated from.
#[derive(Clone, Debug, Deserialize, Eq, Error, Hash, PartialEq, Serialize)]
#[error("{message}")]
pub struct LocatedError {
    pub message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
}

impl LocatedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }

    pub fn at(mut self, location: impl Into<Location>) -> Self {
        self.locations.push(location.into());
        self
    }

    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    /// The path rendered as `user.friends.0.name`.
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl From<&GraphQLParseError> for LocatedError {
    fn from(err: &GraphQLParseError) -> Self {
        LocatedError::new(err.message()).at(Location {
            line: err.line(),
            column: err.column(),
        })
    }
}

/// Returned by `execute` when the request was cancelled before it finished.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("execution was cancelled")]
pub struct Cancelled;
