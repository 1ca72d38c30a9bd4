use crate::coercion::coerce_output_scalar;
use crate::config::ExecutionOptions;
use crate::execution::values::coerce_argument_values;
use crate::execution::values::should_include;
use crate::resolver;
use crate::resolver::FieldValue;
use crate::resolver::ObjectValue;
use crate::resolver::ResolverContext;
use crate::response::Cancelled;
use crate::response::LocatedError;
use crate::response::PathSegment;
use crate::response::Response;
use crate::response::ResultNode;
use crate::schema::Schema;
use crate::types::SchemaType;
use crate::types::TypeKind;
use crate::types::TypeRef;
use crate::Value;
use futures::future::join_all;
use futures::future::BoxFuture;
use futures::FutureExt;
use gqlengine_parser::ast;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// The outcome of completing one position of the result tree.
///
/// `node` is `None` when a null must propagate to the parent position; the
/// error that caused it is already in `errors`.
#[derive(Debug, Default)]
struct Completed {
    node: Option<ResultNode>,
    errors: Vec<LocatedError>,
}

impl Completed {
    fn node(node: ResultNode) -> Self {
        Self {
            node: Some(node),
            errors: vec![],
        }
    }

    fn error(error: LocatedError) -> Self {
        Self {
            node: None,
            errors: vec![error],
        }
    }

    /// A nullable position turns a propagating null into a null value.
    fn absorb(mut self, ty: &TypeRef) -> Self {
        if self.node.is_none() && !ty.is_non_null() {
            self.node = Some(ResultNode::Null);
        }
        self
    }
}

/// The field a value is being completed for, used in error messages.
#[derive(Clone, Copy)]
struct FieldSite<'a> {
    parent_type: &'a str,
    field: &'a ast::Field,
}

impl FieldSite<'_> {
    fn error(&self, message: impl Into<String>, path: &[PathSegment]) -> LocatedError {
        LocatedError::new(message)
            .at(self.field.position)
            .with_path(path.to_vec())
    }
}

/// Per-operation execution state. Everything here is read-only while the
/// operation runs.
pub(crate) struct ExecutionContext<'a> {
    schema: &'a Schema,
    fragments: HashMap<&'a str, &'a ast::FragmentDefinition>,
    variables: IndexMap<String, Value>,
    options: &'a ExecutionOptions,
    cancellation: CancellationToken,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(
        schema: &'a Schema,
        document: &'a ast::Document,
        variables: IndexMap<String, Value>,
        options: &'a ExecutionOptions,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            schema,
            fragments: document
                .fragments()
                .map(|fragment| (fragment.name.as_str(), fragment))
                .collect(),
            variables,
            options,
            cancellation,
        }
    }

    pub(crate) async fn execute_root_selection_set(
        &'a self,
        operation: &'a ast::OperationDefinition,
        root_value: ObjectValue,
    ) -> Result<Response, Cancelled> {
        let Some(root_type) = self.schema.root_type(operation.kind) else {
            return Ok(Response::from_errors(vec![
                LocatedError::new(format!(
                    "Schema is not configured for {} operations.",
                    operation.kind,
                ))
                .at(operation.position),
            ]));
        };

        let serial = operation.kind == ast::OperationKind::Mutation;
        let completed = self
            .execute_selection_set(
                root_type,
                root_value,
                vec![&operation.selection_set],
                vec![],
                serial,
            )
            .await?;

        Ok(Response {
            data: completed.node,
            errors: completed.errors,
        })
    }

    fn execute_selection_set(
        &'a self,
        object_type: &'a SchemaType,
        object_value: ObjectValue,
        selection_sets: Vec<&'a ast::SelectionSet>,
        path: Vec<PathSegment>,
        serial: bool,
    ) -> BoxFuture<'a, Result<Completed, Cancelled>> {
        async move {
            let grouped_field_set = self.collect_fields(object_type, &selection_sets);

            let results = if serial || !self.options.concurrent_fields {
                let mut results = Vec::with_capacity(grouped_field_set.len());
                for (response_key, fields) in &grouped_field_set {
                    results.push(
                        self.execute_field(object_type, &object_value, response_key, fields, &path)
                            .await?,
                    );
                }
                results
            } else {
                join_all(grouped_field_set.iter().map(|(response_key, fields)| {
                    self.execute_field(object_type, &object_value, response_key, fields, &path)
                }))
                .await
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?
            };

            let mut result_map = IndexMap::with_capacity(results.len());
            let mut errors = vec![];
            let mut propagated = false;
            for (response_key, completed) in grouped_field_set.keys().zip(results) {
                errors.extend(completed.errors);
                match completed.node {
                    Some(node) => {
                        result_map.insert(response_key.to_string(), node);
                    },
                    None => propagated = true,
                }
            }

            Ok(Completed {
                node: (!propagated).then_some(ResultNode::Object(result_map)),
                errors,
            })
        }
        .boxed()
    }

    /// Groups the fields of `selection_sets` by response key, in
    /// first-occurrence order, expanding fragments that apply to
    /// `object_type`.
    fn collect_fields(
        &self,
        object_type: &SchemaType,
        selection_sets: &[&'a ast::SelectionSet],
    ) -> IndexMap<&'a str, Vec<&'a ast::Field>> {
        let mut grouped_fields = IndexMap::new();
        let mut visited_fragments = HashSet::new();
        for selection_set in selection_sets {
            self.collect_fields_into(
                object_type,
                selection_set,
                &mut visited_fragments,
                &mut grouped_fields,
            );
        }
        grouped_fields
    }

    fn collect_fields_into(
        &self,
        object_type: &SchemaType,
        selection_set: &'a ast::SelectionSet,
        visited_fragments: &mut HashSet<&'a str>,
        grouped_fields: &mut IndexMap<&'a str, Vec<&'a ast::Field>>,
    ) {
        for selection in &selection_set.items {
            if !should_include(selection.directives(), &self.variables) {
                continue;
            }
            match selection {
                ast::Selection::Field(field) => {
                    grouped_fields
                        .entry(field.response_key())
                        .or_default()
                        .push(field);
                },

                ast::Selection::FragmentSpread(spread) => {
                    let name = spread.fragment_name.as_str();
                    if !visited_fragments.insert(name) {
                        continue;
                    }
                    let Some(fragment) = self.fragments.get(name).copied() else {
                        continue;
                    };
                    if self.does_fragment_type_apply(object_type, Some(&fragment.type_condition)) {
                        self.collect_fields_into(
                            object_type,
                            &fragment.selection_set,
                            visited_fragments,
                            grouped_fields,
                        );
                    }
                },

                ast::Selection::InlineFragment(inline) => {
                    if self.does_fragment_type_apply(object_type, inline.type_condition.as_deref()) {
                        self.collect_fields_into(
                            object_type,
                            &inline.selection_set,
                            visited_fragments,
                            grouped_fields,
                        );
                    }
                },
            }
        }
    }

    fn does_fragment_type_apply(&self, object_type: &SchemaType, condition: Option<&str>) -> bool {
        condition.is_none_or(|condition| {
            self.schema
                .is_subtype_compatible(object_type.name(), condition)
        })
    }

    async fn execute_field(
        &'a self,
        object_type: &'a SchemaType,
        object_value: &ObjectValue,
        response_key: &str,
        fields: &[&'a ast::Field],
        parent_path: &[PathSegment],
    ) -> Result<Completed, Cancelled> {
        let field = fields[0];
        let mut path = parent_path.to_vec();
        path.push(PathSegment::Key(response_key.to_string()));
        let site = FieldSite {
            parent_type: object_type.name(),
            field,
        };

        if field.name == "__typename" {
            return Ok(Completed::node(ResultNode::Scalar(Value::String(
                object_type.name().to_string(),
            ))));
        }

        let Some(field_definition) = object_type.field(&field.name) else {
            let error = site.error(
                format!(
                    "Cannot query field \"{}\" on type \"{}\".",
                    field.name,
                    object_type.name(),
                ),
                &path,
            );
            return Ok(Completed {
                node: Some(ResultNode::Null),
                errors: vec![error],
            });
        };
        let field_type = field_definition.field_type();

        let arguments = match coerce_argument_values(
            field_definition,
            field,
            &self.variables,
            self.schema.types_map(),
        ) {
            Ok(arguments) => arguments,
            Err(message) => {
                return Ok(Completed::error(site.error(message, &path)).absorb(field_type));
            },
        };

        let resolved = match self.schema.resolver_for(object_type.name(), &field.name) {
            Some(field_resolver) => {
                trace!(
                    parent_type = object_type.name(),
                    field = %field.name,
                    path = ?path,
                    "invoking resolver",
                );
                let ctx = ResolverContext {
                    parent: object_value.clone(),
                    parent_type: object_type.name().to_string(),
                    field_name: field.name.clone(),
                    arguments,
                    path: path.clone(),
                    cancellation: self.cancellation.clone(),
                };
                resolver::invoke(field_resolver.as_ref(), ctx, &self.cancellation).await?
            },
            None => resolver::resolve_property(object_value, &field.name),
        };

        match resolved {
            Ok(value) => {
                self.complete_value(site, field_type, fields.to_vec(), value, path)
                    .await
            },
            Err(err) => {
                trace!(field = %field.name, error = %err, "resolver failed");
                Ok(Completed::error(site.error(err.message(), &path)).absorb(field_type))
            },
        }
    }

    /// Shapes a resolved value according to `field_type`, applying null
    /// propagation.
    fn complete_value(
        &'a self,
        site: FieldSite<'a>,
        field_type: &'a TypeRef,
        fields: Vec<&'a ast::Field>,
        value: FieldValue,
        path: Vec<PathSegment>,
    ) -> BoxFuture<'a, Result<Completed, Cancelled>> {
        async move {
            match field_type {
                TypeRef::NonNull(inner_type) => {
                    let mut completed = self
                        .complete_nullable_value(site, inner_type, fields, value, &path)
                        .await?;
                    if matches!(completed.node, Some(ResultNode::Null)) {
                        completed.node = None;
                        completed.errors.push(site.error(
                            format!(
                                "Cannot return null for non-nullable field {}.{}.",
                                site.parent_type, site.field.name,
                            ),
                            &path,
                        ));
                    }
                    Ok(completed)
                },
                _ => Ok(self
                    .complete_nullable_value(site, field_type, fields, value, &path)
                    .await?
                    .absorb(field_type)),
            }
        }
        .boxed()
    }

    async fn complete_nullable_value(
        &'a self,
        site: FieldSite<'a>,
        field_type: &'a TypeRef,
        fields: Vec<&'a ast::Field>,
        value: FieldValue,
        path: &[PathSegment],
    ) -> Result<Completed, Cancelled> {
        if value.is_null() {
            return Ok(Completed::node(ResultNode::Null));
        }

        match field_type {
            TypeRef::NonNull(inner_type) => {
                self.complete_value(site, inner_type, fields, value, path.to_vec())
                    .await
            },

            TypeRef::List(item_type) => {
                let FieldValue::List(items) = value else {
                    return Ok(Completed::error(site.error(
                        format!(
                            "Expected Iterable, but did not find one for field \"{}.{}\".",
                            site.parent_type, site.field.name,
                        ),
                        path,
                    )));
                };
                self.complete_list_value(site, item_type, fields, items, path)
                    .await
            },

            TypeRef::Named(type_name) => {
                let Some(named_type) = self.schema.type_named(type_name) else {
                    return Ok(Completed::error(
                        site.error(format!("Unknown type \"{type_name}\"."), path),
                    ));
                };
                if named_type.is_leaf() {
                    return Ok(match coerce_output_scalar(type_name, value) {
                        Ok(scalar) => Completed::node(ResultNode::Scalar(scalar)),
                        Err(message) => Completed::error(site.error(message, path)),
                    });
                }

                let FieldValue::Object(object_value) = value else {
                    return Ok(Completed::error(site.error(
                        format!(
                            "Expected an object value of type \"{type_name}\" for field \"{}.{}\".",
                            site.parent_type, site.field.name,
                        ),
                        path,
                    )));
                };
                let object_type = match self.resolve_abstract_type(site, named_type, &object_value)
                {
                    Ok(object_type) => object_type,
                    Err(message) => return Ok(Completed::error(site.error(message, path))),
                };
                self.execute_selection_set(
                    object_type,
                    object_value,
                    merge_selection_sets(&fields),
                    path.to_vec(),
                    false,
                )
                .await
            },
        }
    }

    async fn complete_list_value(
        &'a self,
        site: FieldSite<'a>,
        item_type: &'a TypeRef,
        fields: Vec<&'a ast::Field>,
        items: Vec<FieldValue>,
        path: &[PathSegment],
    ) -> Result<Completed, Cancelled> {
        let item_futures = items.into_iter().enumerate().map(|(index, item)| {
            let mut item_path = path.to_vec();
            item_path.push(PathSegment::Index(index));
            self.complete_value(site, item_type, fields.clone(), item, item_path)
        });
        let completed_items = if self.options.concurrent_fields {
            join_all(item_futures).await
        } else {
            let mut completed_items = vec![];
            for item_future in item_futures {
                completed_items.push(item_future.await);
            }
            completed_items
        };

        let mut nodes = Vec::with_capacity(completed_items.len());
        let mut errors = vec![];
        let mut propagated = false;
        for completed in completed_items {
            let completed = completed?;
            errors.extend(completed.errors);
            match completed.node {
                Some(node) => nodes.push(node),
                None => propagated = true,
            }
        }

        Ok(Completed {
            node: (!propagated).then_some(ResultNode::List(nodes)),
            errors,
        })
    }

    /// Narrows a declared result type to the concrete object type of
    /// `object_value`. Object result types are taken as declared.
    fn resolve_abstract_type(
        &self,
        site: FieldSite<'_>,
        declared_type: &'a SchemaType,
        object_value: &ObjectValue,
    ) -> Result<&'a SchemaType, String> {
        if declared_type.kind() == TypeKind::Object {
            return Ok(declared_type);
        }
        let abstract_name = declared_type.name();
        let Some(concrete_name) = object_value.type_name() else {
            return Err(format!(
                "Abstract type \"{abstract_name}\" must resolve to an Object type at runtime \
                 for field \"{}.{}\". The resolved value did not report a concrete type name.",
                site.parent_type, site.field.name,
            ));
        };
        let Some(concrete_type) = self.schema.type_named(concrete_name) else {
            return Err(format!(
                "Abstract type \"{abstract_name}\" was resolved to a type \"{concrete_name}\" \
                 that does not exist inside the schema.",
            ));
        };
        if concrete_type.kind() != TypeKind::Object
            || !self
                .schema
                .is_subtype_compatible(concrete_name, abstract_name)
        {
            return Err(format!(
                "Runtime Object type \"{concrete_name}\" is not a possible type for \
                 \"{abstract_name}\".",
            ));
        }
        Ok(concrete_type)
    }
}

/// The nested selection sets of all fields merged under one response key.
fn merge_selection_sets<'a>(fields: &[&'a ast::Field]) -> Vec<&'a ast::SelectionSet> {
    fields
        .iter()
        .filter_map(|field| field.selection_set.as_ref())
        .collect()
}
