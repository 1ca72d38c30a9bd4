use crate::config::EngineConfig;
use crate::execution;
use crate::resolver::FieldValue;
use crate::resolver::ObjectValue;
use crate::response::Cancelled;
use crate::response::LocatedError;
use crate::response::Request;
use crate::response::Response;
use crate::schema::Schema;
use crate::validation;
use crate::validation::Validator;
use crate::Value;
use gqlengine_parser::ast;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A schema paired with the options requests against it run under.
///
/// Cloning is cheap; the schema is shared.
#[derive(Clone, Debug)]
pub struct Engine {
    schema: Arc<Schema>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self {
            schema: schema.into(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn validate(&self, document: &ast::Document) -> Vec<LocatedError> {
        Validator::new(&self.schema, document)
            .with_options(self.config.validation.clone())
            .validate()
    }

    /// Validates the selected operation of `document` and executes it with
    /// `root` as the parent value of the root fields. Errors in other
    /// operations do not block it.
    pub async fn execute(
        &self,
        document: &ast::Document,
        operation_name: Option<&str>,
        variables: &IndexMap<String, Value>,
        root: FieldValue,
    ) -> Result<Response, Cancelled> {
        self.execute_with_cancellation(
            document,
            operation_name,
            variables,
            root,
            CancellationToken::new(),
        )
        .await
    }

    /// Like [`Engine::execute`], but abandons in-flight resolvers and returns
    /// `Err(Cancelled)` once `cancellation` fires.
    pub async fn execute_with_cancellation(
        &self,
        document: &ast::Document,
        operation_name: Option<&str>,
        variables: &IndexMap<String, Value>,
        root: FieldValue,
        cancellation: CancellationToken,
    ) -> Result<Response, Cancelled> {
        let operation = match execution::get_operation(document, operation_name) {
            Ok(operation) => operation,
            Err(error) => return Ok(Response::from_errors(vec![error])),
        };

        let errors = Validator::new(&self.schema, document)
            .with_options(self.config.validation.clone())
            .validate_operation(operation);
        if !errors.is_empty() {
            return Ok(Response::from_errors(errors));
        }

        if let Some(max_depth) = self.config.execution.max_depth
            && let Some(error) = validation::check_max_depth(document, operation, max_depth)
        {
            return Ok(Response::from_errors(vec![error]));
        }

        let root_value = match root {
            FieldValue::Object(object) => object,
            FieldValue::Null => ObjectValue::empty(),
            _ => {
                return Ok(Response::from_errors(vec![LocatedError::new(
                    "The root value must be an object.",
                )]));
            },
        };

        execution::execute_operation(
            &self.schema,
            document,
            operation,
            variables,
            root_value,
            &self.config.execution,
            cancellation,
        )
        .await
    }

    /// Parses, validates and executes `request`. A parse failure yields a
    /// response with the single located parse error.
    pub async fn execute_request(
        &self,
        request: &Request,
        root: FieldValue,
    ) -> Result<Response, Cancelled> {
        let document = match crate::parse(&request.query) {
            Ok(document) => document,
            Err(err) => return Ok(Response::from_errors(vec![LocatedError::from(&err)])),
        };
        self.execute(
            &document,
            request.operation_name.as_deref(),
            &request.variables,
            root,
        )
        .await
    }
}
