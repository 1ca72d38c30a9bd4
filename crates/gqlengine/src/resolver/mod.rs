//! The bridge between a schema field and the capability that fetches its
//! value from a concrete resource.

mod field_value;
mod resolver_context;

pub use field_value::FieldValue;
pub use field_value::ObjectValue;
pub use resolver_context::ResolverContext;

use crate::Cancelled;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub type ResolverResult = Result<FieldValue, ResolverError>;

/// A failed field resolution. The message becomes the `message` of the
/// located error reported for the field.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{message}")]
pub struct ResolverError {
    message: String,
}

impl ResolverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for ResolverError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ResolverError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// A data-fetching capability bound to a (type, field) pair.
///
/// Any `Fn(ResolverContext) -> impl Future<Output = ResolverResult>` closure
/// is a `Resolver`; use [`sync_resolver`] for closures that return a result
/// directly.
pub trait Resolver: Send + Sync {
    fn resolve(&self, ctx: ResolverContext) -> BoxFuture<'static, ResolverResult>;
}

impl<F, Fut> Resolver for F
where
    F: Fn(ResolverContext) -> Fut + Send + Sync,
    Fut: Future<Output = ResolverResult> + Send + 'static,
{
    fn resolve(&self, ctx: ResolverContext) -> BoxFuture<'static, ResolverResult> {
        Box::pin(self(ctx))
    }
}

/// Wraps a synchronous closure as a [`Resolver`].
pub fn sync_resolver<F>(resolve_fn: F) -> SyncResolver<F>
where
    F: Fn(ResolverContext) -> ResolverResult + Send + Sync,
{
    SyncResolver(resolve_fn)
}

pub struct SyncResolver<F>(F);

impl<F> Resolver for SyncResolver<F>
where
    F: Fn(ResolverContext) -> ResolverResult + Send + Sync,
{
    fn resolve(&self, ctx: ResolverContext) -> BoxFuture<'static, ResolverResult> {
        Box::pin(futures::future::ready((self.0)(ctx)))
    }
}

impl<F> fmt::Debug for SyncResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SyncResolver")
    }
}

/// Runs `resolver`, abandoning it if `cancellation` fires first.
pub(crate) async fn invoke(
    resolver: &dyn Resolver,
    ctx: ResolverContext,
    cancellation: &CancellationToken,
) -> Result<ResolverResult, Cancelled> {
    if cancellation.is_cancelled() {
        return Err(Cancelled);
    }
    let resolution = resolver.resolve(ctx);
    tokio::select! {
        biased;
        _ = cancellation.cancelled() => Err(Cancelled),
        result = resolution => Ok(result),
    }
}

/// Resolution for fields with no bound resolver: reads the same-named
/// property of the parent. Missing properties resolve to null.
pub(crate) fn resolve_property(parent: &ObjectValue, field_name: &str) -> ResolverResult {
    match parent.properties() {
        Some(properties) => Ok(properties.get(field_name).cloned().unwrap_or_default()),
        None => Err(ResolverError::new(format!(
            "no resolver is bound for field `{field_name}` and the parent value has no properties",
        ))),
    }
}
