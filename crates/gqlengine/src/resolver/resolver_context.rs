use crate::response::PathSegment;
use crate::resolver::ObjectValue;
use crate::Value;
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;

/// Everything a [`Resolver`](crate::resolver::Resolver) sees for one
/// (parent value, field) invocation.
#[derive(Clone, Debug)]
pub struct ResolverContext {
    pub(crate) parent: ObjectValue,
    pub(crate) parent_type: String,
    pub(crate) field_name: String,
    pub(crate) arguments: IndexMap<String, Value>,
    pub(crate) path: Vec<PathSegment>,
    pub(crate) cancellation: CancellationToken,
}

impl ResolverContext {
    pub fn new(parent: ObjectValue, parent_type: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            parent,
            parent_type: parent_type.into(),
            field_name: field_name.into(),
            arguments: IndexMap::new(),
            path: vec![],
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: IndexMap<String, Value>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn parent(&self) -> &ObjectValue {
        &self.parent
    }

    /// The concrete object type that owns the field being resolved.
    pub fn parent_type(&self) -> &str {
        &self.parent_type
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Coerced argument values. Arguments that were omitted and have no
    /// default are absent.
    pub fn arguments(&self) -> &IndexMap<String, Value> {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// Response path of the field being resolved.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Triggered when the request is cancelled. Long-running resolvers may
    /// watch it to stop early.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}
