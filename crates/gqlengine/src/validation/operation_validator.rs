use crate::coercion::literal_error;
use crate::config::UnusedVariablePolicy;
use crate::config::ValidationOptions;
use crate::response::LocatedError;
use crate::response::PathSegment;
use crate::schema::Schema;
use crate::types::FieldDefinition;
use crate::types::SchemaType;
use crate::types::TypeRef;
use gqlengine_parser::ast;
use gqlengine_parser::ast::AstPos;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::ptr;

/// Where a directive appears.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum DirectiveLocation {
    Query,
    Mutation,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
}

impl DirectiveLocation {
    pub(super) fn as_str(&self) -> &'static str {
        match self {
            DirectiveLocation::Query => "QUERY",
            DirectiveLocation::Mutation => "MUTATION",
            DirectiveLocation::Field => "FIELD",
            DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
            DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
            DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
        }
    }

    fn allows_conditionals(&self) -> bool {
        matches!(
            self,
            DirectiveLocation::Field
                | DirectiveLocation::FragmentSpread
                | DirectiveLocation::InlineFragment,
        )
    }
}

struct VariableUsage<'a> {
    name: &'a str,
    /// `None` where the expected type is unknown (inside custom scalar
    /// literals); only the declaration is checked then.
    location_type: Option<TypeRef>,
    has_location_default: bool,
    position: AstPos,
}

/// Validates one operation, including every fragment it spreads.
pub(super) struct OperationValidator<'a> {
    schema: &'a Schema,
    fragments: &'a IndexMap<&'a str, &'a ast::FragmentDefinition>,
    operation: &'a ast::OperationDefinition,
    options: &'a ValidationOptions,
    errors: Vec<LocatedError>,
    visited_fragments: HashSet<&'a str>,
    variable_usages: Vec<VariableUsage<'a>>,
}

impl<'a> OperationValidator<'a> {
    pub fn new(
        schema: &'a Schema,
        fragments: &'a IndexMap<&'a str, &'a ast::FragmentDefinition>,
        operation: &'a ast::OperationDefinition,
        options: &'a ValidationOptions,
    ) -> Self {
        Self {
            schema,
            fragments,
            operation,
            options,
            errors: vec![],
            visited_fragments: HashSet::new(),
            variable_usages: vec![],
        }
    }

    pub fn validate(mut self) -> Vec<LocatedError> {
        let operation = self.operation;
        self.validate_variable_definitions();

        let location = match operation.kind {
            ast::OperationKind::Query => DirectiveLocation::Query,
            ast::OperationKind::Mutation => DirectiveLocation::Mutation,
        };
        self.validate_directives(&operation.directives, location, &[]);

        match self.schema.root_type(operation.kind) {
            Some(root_type) => {
                let mut path = vec![];
                self.visit_selection_set(root_type, &operation.selection_set, &mut path);
            },
            None => self.errors.push(
                LocatedError::new(format!(
                    "Schema is not configured for {} operations.",
                    operation.kind,
                ))
                .at(operation.position),
            ),
        }

        self.validate_variable_usages();
        self.errors
    }

    fn validate_variable_definitions(&mut self) {
        let mut seen = HashSet::new();
        let operation = self.operation;
        for var_def in &operation.variable_definitions {
            if !seen.insert(var_def.name.as_str()) {
                self.errors.push(
                    LocatedError::new(format!(
                        "There can be only one variable named \"${}\".",
                        var_def.name,
                    ))
                    .at(var_def.position),
                );
            }

            let var_type = TypeRef::from(&var_def.var_type);
            let type_name = var_type.named_type();
            match self.schema.type_named(type_name) {
                None => {
                    self.errors.push(
                        LocatedError::new(format!("Unknown type \"{type_name}\".")).at(var_def.position),
                    );
                    continue;
                },
                Some(schema_type) if !schema_type.is_input_type() => {
                    self.errors.push(
                        LocatedError::new(format!(
                            "Variable \"${}\" cannot be non-input type \"{var_type}\".",
                            var_def.name,
                        ))
                        .at(var_def.position),
                    );
                    continue;
                },
                Some(_) => (),
            }

            if let Some(default_value) = &var_def.default_value
                && let Some(reason) = literal_error(default_value, &var_type, self.schema.types_map())
            {
                self.errors.push(
                    LocatedError::new(format!(
                        "Variable \"${}\" has invalid default value {}: {reason}",
                        var_def.name,
                        default_value.to_source_string(),
                    ))
                    .at(var_def.position),
                );
            }
        }
    }

    fn visit_selection_set(
        &mut self,
        parent_type: &'a SchemaType,
        selection_set: &'a ast::SelectionSet,
        path: &mut Vec<PathSegment>,
    ) {
        self.validate_field_merging(parent_type, selection_set, path);

        for selection in &selection_set.items {
            match selection {
                ast::Selection::Field(field) => {
                    self.validate_directives(&field.directives, DirectiveLocation::Field, path);
                    path.push(PathSegment::Key(field.response_key().to_string()));
                    self.visit_field(parent_type, field, path);
                    path.pop();
                },
                ast::Selection::FragmentSpread(spread) => {
                    self.validate_directives(
                        &spread.directives,
                        DirectiveLocation::FragmentSpread,
                        path,
                    );
                    self.visit_fragment_spread(parent_type, spread, path);
                },
                ast::Selection::InlineFragment(inline) => {
                    self.validate_directives(
                        &inline.directives,
                        DirectiveLocation::InlineFragment,
                        path,
                    );
                    let fragment_type = match &inline.type_condition {
                        None => parent_type,
                        Some(condition) => {
                            match self.condition_type(parent_type, condition, None, inline.position, path) {
                                Some(fragment_type) => fragment_type,
                                None => continue,
                            }
                        },
                    };
                    self.visit_selection_set(fragment_type, &inline.selection_set, path);
                },
            }
        }
    }

    fn visit_field(
        &mut self,
        parent_type: &'a SchemaType,
        field: &'a ast::Field,
        path: &mut Vec<PathSegment>,
    ) {
        if field.name == "__typename" {
            for arg in &field.arguments {
                self.error_at(
                    format!("Unknown argument \"{}\" on field \"{}.__typename\".", arg.name, parent_type.name()),
                    arg.position,
                    path,
                );
            }
            if field.selection_set.is_some() {
                self.error_at(
                    "Field \"__typename\" must not have a selection since type \"String!\" has no subfields.",
                    field.position,
                    path,
                );
            }
            return;
        }

        let Some(field_def) = parent_type.field(&field.name) else {
            let hint = if parent_type.is_abstract() {
                " Did you mean to use an inline fragment?"
            } else {
                ""
            };
            self.error_at(
                format!(
                    "Cannot query field \"{}\" on type \"{}\".{hint}",
                    field.name,
                    parent_type.name(),
                ),
                field.position,
                path,
            );
            return;
        };

        self.validate_arguments(parent_type, field_def, field, path);

        let Some(field_type) = self.schema.type_named(field_def.field_type().named_type()) else {
            return;
        };
        match (&field.selection_set, field_type.is_leaf()) {
            (Some(_), true) => self.error_at(
                format!(
                    "Field \"{}\" must not have a selection since type \"{}\" has no subfields.",
                    field.name,
                    field_def.field_type(),
                ),
                field.position,
                path,
            ),
            (None, false) => self.error_at(
                format!(
                    "Field \"{}\" of type \"{}\" must have a selection of subfields. Did you mean \"{} {{ ... }}\"?",
                    field.name,
                    field_def.field_type(),
                    field.name,
                ),
                field.position,
                path,
            ),
            (Some(selection_set), false) => self.visit_selection_set(field_type, selection_set, path),
            (None, true) => (),
        }
    }

    fn visit_fragment_spread(
        &mut self,
        parent_type: &'a SchemaType,
        spread: &'a ast::FragmentSpread,
        path: &mut Vec<PathSegment>,
    ) {
        let Some(fragment) = self.fragments.get(spread.fragment_name.as_str()).copied() else {
            self.error_at(
                format!("Unknown fragment \"{}\".", spread.fragment_name),
                spread.position,
                path,
            );
            return;
        };
        let Some(fragment_type) = self.condition_type(
            parent_type,
            &fragment.type_condition,
            Some(fragment.name.as_str()),
            spread.position,
            path,
        ) else {
            return;
        };
        // Each fragment body is walked once per operation; a spread cycle
        // ends here.
        if self.visited_fragments.insert(fragment.name.as_str()) {
            self.visit_selection_set(fragment_type, &fragment.selection_set, path);
        }
    }

    /// Resolves a fragment's type condition, reporting conditions that can
    /// never apply within `parent_type`. Unknown and non-composite conditions
    /// of named fragments are reported with the fragment definition.
    fn condition_type(
        &mut self,
        parent_type: &'a SchemaType,
        condition: &str,
        fragment_name: Option<&str>,
        position: AstPos,
        path: &[PathSegment],
    ) -> Option<&'a SchemaType> {
        let Some(condition_type) = self.schema.type_named(condition) else {
            if fragment_name.is_none() {
                self.error_at(format!("Unknown type \"{condition}\"."), position, path);
            }
            return None;
        };
        if !condition_type.is_composite() {
            if fragment_name.is_none() {
                self.error_at(
                    format!("Fragment cannot condition on non composite type \"{condition}\"."),
                    position,
                    path,
                );
            }
            return None;
        }
        if !self.schema.types_overlap(parent_type.name(), condition) {
            let subject = match fragment_name {
                Some(name) => format!("Fragment \"{name}\""),
                None => "Fragment".to_string(),
            };
            self.error_at(
                format!(
                    "{subject} cannot be spread here as objects of type \"{}\" can never be of type \"{condition}\".",
                    parent_type.name(),
                ),
                position,
                path,
            );
            return None;
        }
        Some(condition_type)
    }

    fn validate_arguments(
        &mut self,
        parent_type: &SchemaType,
        field_def: &FieldDefinition,
        field: &'a ast::Field,
        path: &[PathSegment],
    ) {
        let mut seen = HashSet::new();
        for arg in &field.arguments {
            if !seen.insert(arg.name.as_str()) {
                self.error_at(
                    format!("There can be only one argument named \"{}\".", arg.name),
                    arg.position,
                    path,
                );
                continue;
            }
            let Some(arg_def) = field_def.argument(&arg.name) else {
                self.error_at(
                    format!(
                        "Unknown argument \"{}\" on field \"{}.{}\".",
                        arg.name,
                        parent_type.name(),
                        field.name,
                    ),
                    arg.position,
                    path,
                );
                continue;
            };
            if let Some(reason) = literal_error(&arg.value, arg_def.value_type(), self.schema.types_map()) {
                self.error_at(
                    format!(
                        "Argument \"{}\" has invalid value {}: {reason}",
                        arg.name,
                        arg.value.to_source_string(),
                    ),
                    arg.position,
                    path,
                );
            }
            self.record_variable_usages(
                &arg.value,
                Some(arg_def.value_type()),
                arg_def.default_value().is_some(),
                arg.position,
            );
        }

        for arg_def in field_def.arguments().values() {
            if arg_def.is_required() && field.argument(arg_def.name()).is_none() {
                self.error_at(
                    format!(
                        "Field \"{}\" argument \"{}\" of type \"{}\" is required, but it was not provided.",
                        field.name,
                        arg_def.name(),
                        arg_def.value_type(),
                    ),
                    field.position,
                    path,
                );
            }
        }
    }

    fn validate_directives(
        &mut self,
        directives: &'a [ast::Directive],
        location: DirectiveLocation,
        path: &[PathSegment],
    ) {
        let boolean = TypeRef::non_null(TypeRef::named("Boolean"));
        let mut seen = HashSet::new();
        for directive in directives {
            let name = directive.name.as_str();
            if name != "skip" && name != "include" {
                self.error_at(format!("Unknown directive \"@{name}\"."), directive.position, path);
                continue;
            }
            if !location.allows_conditionals() {
                self.error_at(
                    format!("Directive \"@{name}\" may not be used on {}.", location.as_str()),
                    directive.position,
                    path,
                );
                continue;
            }
            if !seen.insert(name) {
                self.error_at(
                    format!("The directive \"@{name}\" can only be used once at this location."),
                    directive.position,
                    path,
                );
            }
            for arg in &directive.arguments {
                if arg.name != "if" {
                    self.error_at(
                        format!("Unknown argument \"{}\" on directive \"@{name}\".", arg.name),
                        arg.position,
                        path,
                    );
                    continue;
                }
                if let Some(reason) = literal_error(&arg.value, &boolean, self.schema.types_map()) {
                    self.error_at(
                        format!(
                            "Argument \"if\" has invalid value {}: {reason}",
                            arg.value.to_source_string(),
                        ),
                        arg.position,
                        path,
                    );
                }
                self.record_variable_usages(&arg.value, Some(&boolean), false, arg.position);
            }
            if directive.argument("if").is_none() {
                self.error_at(
                    format!(
                        "Directive \"@{name}\" argument \"if\" of type \"Boolean!\" is required, but it was not provided."
                    ),
                    directive.position,
                    path,
                );
            }
        }
    }

    fn record_variable_usages(
        &mut self,
        value: &'a ast::Value,
        expected: Option<&TypeRef>,
        has_location_default: bool,
        position: AstPos,
    ) {
        match value {
            ast::Value::Variable(name) => self.variable_usages.push(VariableUsage {
                name,
                location_type: expected.cloned(),
                has_location_default,
                position,
            }),
            ast::Value::List(items) => {
                let item_type = expected.and_then(TypeRef::list_item);
                for item in items {
                    self.record_variable_usages(item, item_type, false, position);
                }
            },
            ast::Value::Object(fields) => {
                for (_, field_value) in fields {
                    self.record_variable_usages(field_value, None, false, position);
                }
            },
            _ => (),
        }
    }

    fn validate_variable_usages(&mut self) {
        let operation = self.operation;
        let mut used = HashSet::new();
        let mut reported_undefined = HashSet::new();
        for usage in std::mem::take(&mut self.variable_usages) {
            used.insert(usage.name);
            let Some(var_def) = operation.variable_definition(usage.name) else {
                if reported_undefined.insert(usage.name) {
                    let message = match &operation.name {
                        Some(op_name) => format!(
                            "Variable \"${}\" is not defined by operation \"{op_name}\".",
                            usage.name,
                        ),
                        None => format!("Variable \"${}\" is not defined.", usage.name),
                    };
                    self.errors.push(
                        LocatedError::new(message)
                            .at(usage.position)
                            .at(operation.position),
                    );
                }
                continue;
            };
            let Some(location_type) = &usage.location_type else {
                continue;
            };
            let var_type = TypeRef::from(&var_def.var_type);
            let has_non_null_default = var_def
                .default_value
                .as_ref()
                .is_some_and(|value| !matches!(value, ast::Value::Null));
            if !is_variable_usage_allowed(
                &var_type,
                has_non_null_default,
                location_type,
                usage.has_location_default,
            ) {
                self.errors.push(
                    LocatedError::new(format!(
                        "Variable \"${}\" of type \"{var_type}\" used in position expecting type \"{location_type}\".",
                        usage.name,
                    ))
                    .at(var_def.position)
                    .at(usage.position),
                );
            }
        }

        if self.options.unused_variables == UnusedVariablePolicy::Error {
            for var_def in &operation.variable_definitions {
                if used.contains(var_def.name.as_str()) {
                    continue;
                }
                let message = match &operation.name {
                    Some(op_name) => format!(
                        "Variable \"${}\" is never used in operation \"{op_name}\".",
                        var_def.name,
                    ),
                    None => format!("Variable \"${}\" is never used.", var_def.name),
                };
                self.errors.push(LocatedError::new(message).at(var_def.position));
            }
        }
    }

    /// Fields sharing a response key must be mergeable: the same field with
    /// the same arguments and mergeable sub-selections, unless they can never
    /// apply to the same object.
    fn validate_field_merging(
        &mut self,
        parent_type: &'a SchemaType,
        selection_set: &'a ast::SelectionSet,
        path: &[PathSegment],
    ) {
        let mut fields = vec![];
        let mut visited = HashSet::new();
        self.collect_fields_for_merging(parent_type, selection_set, &mut visited, &mut fields);

        for (response_key, group) in group_by_response_key(fields) {
            let conflict = group.iter().enumerate().find_map(|(idx, field_a)| {
                group[idx + 1..]
                    .iter()
                    .find_map(|field_b| self.find_conflict(*field_a, *field_b))
            });
            if let Some(conflict) = conflict {
                let mut field_path = path.to_vec();
                field_path.push(PathSegment::Key(response_key.to_string()));
                let mut error = LocatedError::new(format!(
                    "Fields \"{response_key}\" conflict because {}. Use different aliases on the fields to fetch both if this was intentional.",
                    conflict.reason,
                ));
                for field in conflict.left.iter().chain(&conflict.right) {
                    error = error.at(field.position);
                }
                self.errors.push(error.with_path(field_path));
            }
        }
    }

    /// The first reason two fields with the same response key cannot be
    /// merged. Fields that agree on name and arguments are compared through
    /// their sub-selections.
    fn find_conflict(
        &self,
        (owner_a, field_a): MergeField<'a>,
        (owner_b, field_b): MergeField<'a>,
    ) -> Option<FieldConflict<'a>> {
        if ptr::eq(field_a, field_b) {
            return None;
        }
        let mutually_exclusive =
            owner_a.name() != owner_b.name() && !owner_a.is_abstract() && !owner_b.is_abstract();
        if mutually_exclusive {
            return None;
        }

        let reason = if field_a.name != field_b.name {
            Some(format!("\"{}\" and \"{}\" are different fields", field_a.name, field_b.name))
        } else if !same_arguments(&field_a.arguments, &field_b.arguments) {
            Some("they have differing arguments".to_string())
        } else {
            None
        };
        if let Some(reason) = reason {
            return Some(FieldConflict {
                reason,
                left: vec![field_a],
                right: vec![field_b],
            });
        }

        let sub_fields_b = group_by_response_key(self.sub_fields_for_merging(owner_b, field_b));
        for sub_field_a in self.sub_fields_for_merging(owner_a, field_a) {
            let sub_key = sub_field_a.1.response_key();
            let Some(candidates) = sub_fields_b.get(sub_key) else {
                continue;
            };
            for sub_field_b in candidates {
                if let Some(nested) = self.find_conflict(sub_field_a, *sub_field_b) {
                    let mut left = vec![field_a];
                    left.extend(nested.left);
                    let mut right = vec![field_b];
                    right.extend(nested.right);
                    return Some(FieldConflict {
                        reason: format!("subfields \"{sub_key}\" conflict because {}", nested.reason),
                        left,
                        right,
                    });
                }
            }
        }
        None
    }

    /// The fields selected under `field`, owned by its return type.
    fn sub_fields_for_merging(
        &self,
        owner: &'a SchemaType,
        field: &'a ast::Field,
    ) -> Vec<MergeField<'a>> {
        let mut out = vec![];
        let Some(selection_set) = &field.selection_set else {
            return out;
        };
        let Some(return_type) = owner
            .field(&field.name)
            .and_then(|field_def| self.schema.type_named(field_def.field_type().named_type()))
        else {
            return out;
        };
        let mut visited = HashSet::new();
        self.collect_fields_for_merging(return_type, selection_set, &mut visited, &mut out);
        out
    }

    fn collect_fields_for_merging(
        &self,
        parent_type: &'a SchemaType,
        selection_set: &'a ast::SelectionSet,
        visited: &mut HashSet<&'a str>,
        out: &mut Vec<MergeField<'a>>,
    ) {
        for selection in &selection_set.items {
            match selection {
                ast::Selection::Field(field) => out.push((parent_type, field)),
                ast::Selection::InlineFragment(inline) => {
                    let owner = match &inline.type_condition {
                        None => Some(parent_type),
                        Some(condition) => self.schema.type_named(condition),
                    };
                    if let Some(owner) = owner {
                        self.collect_fields_for_merging(owner, &inline.selection_set, visited, out);
                    }
                },
                ast::Selection::FragmentSpread(spread) => {
                    let name = spread.fragment_name.as_str();
                    if !visited.insert(name) {
                        continue;
                    }
                    let Some(fragment) = self.fragments.get(name).copied() else {
                        continue;
                    };
                    if let Some(owner) = self.schema.type_named(&fragment.type_condition) {
                        self.collect_fields_for_merging(owner, &fragment.selection_set, visited, out);
                    }
                },
            }
        }
    }

    fn error_at(&mut self, message: impl Into<String>, position: AstPos, path: &[PathSegment]) {
        self.errors.push(LocatedError::new(message).at(position).with_path(path.to_vec()));
    }
}

/// A selected field together with the type it is selected on.
type MergeField<'a> = (&'a SchemaType, &'a ast::Field);

struct FieldConflict<'a> {
    reason: String,
    left: Vec<&'a ast::Field>,
    right: Vec<&'a ast::Field>,
}

fn group_by_response_key<'a>(fields: Vec<MergeField<'a>>) -> IndexMap<&'a str, Vec<MergeField<'a>>> {
    let mut by_key: IndexMap<&'a str, Vec<MergeField<'a>>> = IndexMap::new();
    for (owner, field) in fields {
        by_key.entry(field.response_key()).or_default().push((owner, field));
    }
    by_key
}

fn same_arguments(a: &[ast::Argument], b: &[ast::Argument]) -> bool {
    a.len() == b.len()
        && a.iter().all(|arg_a| {
            b.iter()
                .any(|arg_b| arg_a.name == arg_b.name && arg_a.value == arg_b.value)
        })
}

/// https://spec.graphql.org/October2021/#IsVariableUsageAllowed()
fn is_variable_usage_allowed(
    var_type: &TypeRef,
    has_non_null_var_default: bool,
    location_type: &TypeRef,
    has_location_default: bool,
) -> bool {
    if location_type.is_non_null() && !var_type.is_non_null() {
        if !has_non_null_var_default && !has_location_default {
            return false;
        }
        return are_types_compatible(var_type, location_type.nullable());
    }
    are_types_compatible(var_type, location_type)
}

fn are_types_compatible(var_type: &TypeRef, location_type: &TypeRef) -> bool {
    match (var_type, location_type) {
        (TypeRef::NonNull(var_inner), TypeRef::NonNull(location_inner)) => {
            are_types_compatible(var_inner, location_inner)
        },
        (_, TypeRef::NonNull(_)) => false,
        (TypeRef::NonNull(var_inner), _) => are_types_compatible(var_inner, location_type),
        (TypeRef::List(var_inner), TypeRef::List(location_inner)) => {
            are_types_compatible(var_inner, location_inner)
        },
        (TypeRef::Named(var_name), TypeRef::Named(location_name)) => var_name == location_name,
        _ => false,
    }
}
