use serde::Deserialize;
use serde::Serialize;

/// Engine-wide options. Every field has a default, so `{}` is a valid
/// configuration document.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub validation: ValidationOptions,
    pub execution: ExecutionOptions,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationOptions {
    pub unused_variables: UnusedVariablePolicy,
}

/// How validation treats declared variables that no selection uses.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnusedVariablePolicy {
    #[default]
    Error,
    Ignore,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionOptions {
    /// Resolve sibling fields of query selection sets concurrently. Mutation
    /// root fields always run one at a time.
    pub concurrent_fields: bool,

    /// Maximum field nesting depth of an operation, checked before execution.
    /// Deeper operations are rejected with a validation error.
    pub max_depth: Option<usize>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            concurrent_fields: true,
            max_depth: None,
        }
    }
}
