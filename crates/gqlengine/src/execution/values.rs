use crate::coercion::coerce_input_value;
use crate::response::LocatedError;
use crate::schema::Schema;
use crate::types::FieldDefinition;
use crate::types::TypeRef;
use crate::types::TypesMap;
use crate::Value;
use gqlengine_parser::ast;
use indexmap::IndexMap;
use tracing::debug;

/// Coerces the supplied variable values against the operation's variable
/// definitions.
///
/// Variables that were neither supplied nor defaulted are left out of the
/// result, so argument coercion can tell "absent" apart from "null".
pub(crate) fn coerce_variable_values(
    schema: &Schema,
    operation: &ast::OperationDefinition,
    supplied: &IndexMap<String, Value>,
) -> Result<IndexMap<String, Value>, Vec<LocatedError>> {
    let mut coerced_values = IndexMap::new();
    let mut errors = vec![];

    for variable_def in &operation.variable_definitions {
        let name = &variable_def.name;
        let var_type = TypeRef::from(&variable_def.var_type);

        let is_input_type = schema
            .type_named(var_type.named_type())
            .is_some_and(|named_type| named_type.is_input_type());
        if !is_input_type {
            errors.push(
                LocatedError::new(format!(
                    "Variable \"${name}\" cannot be non-input type \"{var_type}\".",
                ))
                .at(variable_def.position),
            );
            continue;
        }

        let value = match (supplied.get(name), &variable_def.default_value) {
            (Some(value), _) => value.clone(),
            (None, Some(default_value)) => Value::from_const_ast(default_value),
            (None, None) => {
                if var_type.is_non_null() {
                    errors.push(
                        LocatedError::new(format!(
                            "Variable \"${name}\" of required type \"{var_type}\" was not provided.",
                        ))
                        .at(variable_def.position),
                    );
                }
                continue;
            },
        };

        if value.is_null() && var_type.is_non_null() {
            errors.push(
                LocatedError::new(format!(
                    "Variable \"${name}\" of non-null type \"{var_type}\" must not be null.",
                ))
                .at(variable_def.position),
            );
            continue;
        }

        match coerce_input_value(&value, &var_type, schema.types_map()) {
            Ok(coerced) => {
                coerced_values.insert(name.clone(), coerced);
            },
            Err(reason) => errors.push(
                LocatedError::new(format!(
                    "Variable \"${name}\" got invalid value {value}; {reason}",
                ))
                .at(variable_def.position),
            ),
        }
    }

    if errors.is_empty() {
        Ok(coerced_values)
    } else {
        debug!(
            errors = errors.len(),
            first = %errors[0],
            "variable coercion failed",
        );
        Err(errors)
    }
}

/// Coerces the arguments of one field selection.
///
/// A variable reference whose variable has no coerced value counts as an
/// omitted argument and falls back to the argument's default.
pub(crate) fn coerce_argument_values(
    field_definition: &FieldDefinition,
    field: &ast::Field,
    variables: &IndexMap<String, Value>,
    types: &TypesMap,
) -> Result<IndexMap<String, Value>, String> {
    let mut coerced_values = IndexMap::new();

    for argument_def in field_definition.arguments().values() {
        let name = argument_def.name();
        let supplied = field
            .argument(name)
            .map(|argument| &argument.value)
            .filter(|value| match value {
                ast::Value::Variable(var_name) => variables.contains_key(var_name),
                _ => true,
            });

        match supplied {
            Some(literal) => {
                let value = Value::from_ast(literal, variables);
                let coerced = coerce_input_value(&value, argument_def.value_type(), types)
                    .map_err(|reason| {
                        format!("Argument \"{name}\" has invalid value {value}: {reason}")
                    })?;
                coerced_values.insert(name.to_string(), coerced);
            },
            None => {
                if let Some(default_value) = argument_def.default_value() {
                    coerced_values.insert(name.to_string(), default_value.clone());
                } else if argument_def.value_type().is_non_null() {
                    return Err(format!(
                        "Argument \"{name}\" of required type \"{}\" was not provided.",
                        argument_def.value_type(),
                    ));
                }
            },
        }
    }

    Ok(coerced_values)
}

/// Evaluates `@skip` and `@include` on a selection.
pub(crate) fn should_include(
    directives: &[ast::Directive],
    variables: &IndexMap<String, Value>,
) -> bool {
    directives.iter().all(|directive| {
        let condition = directive
            .argument("if")
            .map(|argument| Value::from_ast(&argument.value, variables))
            .and_then(|value| value.as_bool());
        match directive.name.as_str() {
            "skip" => condition != Some(true),
            "include" => condition == Some(true),
            _ => true,
        }
    })
}
