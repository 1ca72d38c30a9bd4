//! Asynchronous execution of a validated operation.
//!
//! Sibling fields of query selection sets are resolved concurrently and
//! joined in response-key order; mutation root fields run one at a time. A
//! null in a non-null position propagates to the nearest nullable ancestor.

mod executor;
mod values;

use crate::config::ExecutionOptions;
use crate::resolver::ObjectValue;
use crate::response::Cancelled;
use crate::response::LocatedError;
use crate::response::Response;
use crate::schema::Schema;
use crate::Value;
use executor::ExecutionContext;
use gqlengine_parser::ast;
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;
use tracing::debug_span;
use tracing::Instrument;
use values::coerce_variable_values;

/// Picks the operation to run from `document`.
pub(crate) fn get_operation<'a>(
    document: &'a ast::Document,
    operation_name: Option<&str>,
) -> Result<&'a ast::OperationDefinition, LocatedError> {
    match operation_name {
        Some(name) => document
            .operations()
            .find(|operation| operation.name.as_deref() == Some(name))
            .ok_or_else(|| LocatedError::new(format!("Unknown operation named \"{name}\"."))),
        None => {
            let mut operations = document.operations();
            match (operations.next(), operations.next()) {
                (Some(operation), None) => Ok(operation),
                (None, _) => Err(LocatedError::new("Must provide an operation.")),
                (Some(_), Some(_)) => Err(LocatedError::new(
                    "Must provide operation name if query contains multiple operations.",
                )),
            }
        },
    }
}

/// Coerces variables and runs `operation`. Variable errors are returned as
/// a response without data; no resolver runs in that case.
pub(crate) async fn execute_operation(
    schema: &Schema,
    document: &ast::Document,
    operation: &ast::OperationDefinition,
    variables: &IndexMap<String, Value>,
    root_value: ObjectValue,
    options: &ExecutionOptions,
    cancellation: CancellationToken,
) -> Result<Response, Cancelled> {
    if cancellation.is_cancelled() {
        return Err(Cancelled);
    }

    let coerced_variables = match coerce_variable_values(schema, operation, variables) {
        Ok(coerced_variables) => coerced_variables,
        Err(errors) => return Ok(Response::from_errors(errors)),
    };

    let span = debug_span!(
        "execute_operation",
        kind = %operation.kind,
        name = operation.name.as_deref().unwrap_or(""),
    );
    let ctx = ExecutionContext::new(schema, document, coerced_variables, options, cancellation);
    ctx.execute_root_selection_set(operation, root_value)
        .instrument(span)
        .await
}

#[cfg(test)]
mod tests;
