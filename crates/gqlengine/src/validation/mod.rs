//! Static validation of executable documents against a [`Schema`].
//!
//! All checks run and their errors accumulate; an operation with any error
//! is not executed.

mod fragment_graph;
mod operation_validator;

use crate::config::ValidationOptions;
use crate::response::LocatedError;
use crate::schema::Schema;
use fragment_graph::collect_spread_names;
use fragment_graph::FragmentGraph;
use gqlengine_parser::ast;
use indexmap::IndexMap;
use operation_validator::DirectiveLocation;
use operation_validator::OperationValidator;
use std::collections::HashMap;
use std::collections::HashSet;
use tracing::debug;

/// Validates `document` against `schema` with default options.
pub fn validate(document: &ast::Document, schema: &Schema) -> Vec<LocatedError> {
    Validator::new(schema, document).validate()
}

pub struct Validator<'a> {
    schema: &'a Schema,
    document: &'a ast::Document,
    options: ValidationOptions,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a Schema, document: &'a ast::Document) -> Self {
        Self {
            schema,
            document,
            options: ValidationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Checks every operation and fragment in the document.
    pub fn validate(&self) -> Vec<LocatedError> {
        let mut errors = vec![];
        let fragments = self.unique_fragments(&mut errors);
        let graph = FragmentGraph::new(&fragments);
        self.validate_document(&fragments, &graph, None, &mut errors);

        for operation in self.document.operations() {
            errors.append(
                &mut OperationValidator::new(self.schema, &fragments, operation, &self.options)
                    .validate(),
            );
        }
        finish(errors)
    }

    /// Checks `operation` and the fragments it reaches, along with the
    /// document-wide rules. Errors confined to other operations, or to
    /// fragments only they spread, are not reported.
    pub fn validate_operation(&self, operation: &'a ast::OperationDefinition) -> Vec<LocatedError> {
        let mut errors = vec![];
        let fragments = self.unique_fragments(&mut errors);
        let graph = FragmentGraph::new(&fragments);
        let mut spreads = vec![];
        collect_spread_names(&operation.selection_set, &mut spreads);
        let reached = graph.reachable_from(spreads);
        self.validate_document(&fragments, &graph, Some(&reached), &mut errors);

        errors.append(
            &mut OperationValidator::new(self.schema, &fragments, operation, &self.options)
                .validate(),
        );
        finish(errors)
    }

    /// The first definition of each fragment name; later ones are reported.
    fn unique_fragments(
        &self,
        errors: &mut Vec<LocatedError>,
    ) -> IndexMap<&'a str, &'a ast::FragmentDefinition> {
        let mut fragments: IndexMap<&'a str, &'a ast::FragmentDefinition> = IndexMap::new();
        for fragment in self.document.fragments() {
            if fragments.contains_key(fragment.name.as_str()) {
                errors.push(
                    LocatedError::new(format!(
                        "There can be only one fragment named \"{}\".",
                        fragment.name,
                    ))
                    .at(fragment.position),
                );
                continue;
            }
            fragments.insert(&fragment.name, fragment);
        }
        fragments
    }

    /// Rules that span operations: unique operation names, fragment
    /// definitions, spread cycles and unused fragments. With `scope`, only
    /// the fragments in it have their definitions and cycles checked.
    fn validate_document(
        &self,
        fragments: &IndexMap<&'a str, &'a ast::FragmentDefinition>,
        graph: &FragmentGraph<'a>,
        scope: Option<&HashSet<&'a str>>,
        errors: &mut Vec<LocatedError>,
    ) {
        let in_scope = |name: &str| scope.is_none_or(|scope| scope.contains(name));

        let mut operation_names = HashSet::new();
        for operation in self.document.operations() {
            if let Some(name) = &operation.name
                && !operation_names.insert(name.as_str())
            {
                errors.push(
                    LocatedError::new(format!("There can be only one operation named \"{name}\"."))
                        .at(operation.position),
                );
            }
        }

        for (name, fragment) in fragments {
            if in_scope(*name) {
                self.validate_fragment_definition(fragment, errors);
            }
        }

        for cycle in graph.find_cycles() {
            let Some(first) = cycle.first() else {
                continue;
            };
            if !in_scope(first.as_str()) {
                continue;
            }
            let via = &cycle[1..cycle.len() - 1];
            let via = if via.is_empty() {
                String::new()
            } else {
                let names: Vec<String> = via.iter().map(|name| format!("\"{name}\"")).collect();
                format!(" via {}", names.join(", "))
            };
            let mut error =
                LocatedError::new(format!("Cannot spread fragment \"{first}\" within itself{via}."));
            if let Some(fragment) = fragments.get(first.as_str()) {
                error = error.at(fragment.position);
            }
            errors.push(error);
        }

        let mut operation_spreads = vec![];
        for operation in self.document.operations() {
            collect_spread_names(&operation.selection_set, &mut operation_spreads);
        }
        let used = graph.reachable_from(operation_spreads);
        for (name, fragment) in fragments {
            if !used.contains(name) {
                errors.push(
                    LocatedError::new(format!("Fragment \"{name}\" is never used."))
                        .at(fragment.position),
                );
            }
        }
    }

    fn validate_fragment_definition(
        &self,
        fragment: &ast::FragmentDefinition,
        errors: &mut Vec<LocatedError>,
    ) {
        let condition = &fragment.type_condition;
        match self.schema.type_named(condition) {
            None => errors.push(
                LocatedError::new(format!("Unknown type \"{condition}\".")).at(fragment.position),
            ),
            Some(condition_type) if !condition_type.is_composite() => errors.push(
                LocatedError::new(format!(
                    "Fragment \"{}\" cannot condition on non composite type \"{condition}\".",
                    fragment.name,
                ))
                .at(fragment.position),
            ),
            Some(_) => (),
        }
        for directive in &fragment.directives {
            errors.push(
                LocatedError::new(format!(
                    "Directive \"@{}\" may not be used on {}.",
                    directive.name,
                    DirectiveLocation::FragmentDefinition.as_str(),
                ))
                .at(directive.position),
            );
        }
    }
}

/// Rejects an operation whose fields nest deeper than `max_depth`.
pub(crate) fn check_max_depth(
    document: &ast::Document,
    operation: &ast::OperationDefinition,
    max_depth: usize,
) -> Option<LocatedError> {
    let fragments: HashMap<&str, &ast::FragmentDefinition> = document
        .fragments()
        .map(|fragment| (fragment.name.as_str(), fragment))
        .collect();
    let mut visiting = HashSet::new();
    let mut fragment_depths = HashMap::new();
    let depth = selection_depth(
        &operation.selection_set,
        &fragments,
        &mut visiting,
        &mut fragment_depths,
    );
    if depth <= max_depth {
        return None;
    }
    let subject = match &operation.name {
        Some(name) => format!("Operation \"{name}\""),
        None => "Operation".to_string(),
    };
    Some(
        LocatedError::new(format!(
            "{subject} has depth {depth}, which exceeds the maximum depth of {max_depth}.",
        ))
        .at(operation.position),
    )
}

fn selection_depth<'a>(
    selection_set: &'a ast::SelectionSet,
    fragments: &HashMap<&str, &'a ast::FragmentDefinition>,
    visiting: &mut HashSet<&'a str>,
    fragment_depths: &mut HashMap<&'a str, usize>,
) -> usize {
    selection_set
        .items
        .iter()
        .map(|selection| match selection {
            ast::Selection::Field(field) => {
                1 + field
                    .selection_set
                    .as_ref()
                    .map_or(0, |nested| {
                        selection_depth(nested, fragments, visiting, fragment_depths)
                    })
            },
            ast::Selection::InlineFragment(inline) => {
                selection_depth(&inline.selection_set, fragments, visiting, fragment_depths)
            },
            ast::Selection::FragmentSpread(spread) => {
                let name = spread.fragment_name.as_str();
                if let Some(depth) = fragment_depths.get(name) {
                    return *depth;
                }
                let Some(fragment) = fragments.get(name).copied() else {
                    return 0;
                };
                if !visiting.insert(name) {
                    return 0;
                }
                let depth =
                    selection_depth(&fragment.selection_set, fragments, visiting, fragment_depths);
                visiting.remove(name);
                fragment_depths.insert(name, depth);
                depth
            },
        })
        .max()
        .unwrap_or(0)
}

fn finish(errors: Vec<LocatedError>) -> Vec<LocatedError> {
    let mut seen = HashSet::new();
    let errors: Vec<LocatedError> = errors
        .into_iter()
        .filter(|err| seen.insert((err.message.clone(), err.locations.clone())))
        .collect();
    if !errors.is_empty() {
        debug!(
            errors = errors.len(),
            first = %errors[0],
            "document failed validation",
        );
    }
    errors
}

#[cfg(test)]
mod tests;
