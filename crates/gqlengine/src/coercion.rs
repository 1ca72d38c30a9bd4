//! Input coercion of variables and arguments, and output coercion of scalar
//! leaves.

use crate::resolver::FieldValue;
use crate::types::TypeKind;
use crate::types::TypeRef;
use crate::types::TypesMap;
use crate::Value;
use gqlengine_parser::ast;

pub(crate) const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Coerces a runtime input value (a supplied variable or a literal with its
/// variables substituted) to `ty`.
pub(crate) fn coerce_input_value(
    value: &Value,
    ty: &TypeRef,
    types: &TypesMap,
) -> Result<Value, String> {
    match ty {
        TypeRef::NonNull(inner) => {
            if value.is_null() {
                return Err(format!("Expected non-nullable type \"{ty}\" not to be null."));
            }
            coerce_input_value(value, inner, types)
        },
        _ if value.is_null() => Ok(Value::Null),
        TypeRef::List(inner) => match value {
            Value::List(items) => items
                .iter()
                .map(|item| coerce_input_value(item, inner, types))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            single => Ok(Value::List(vec![coerce_input_value(single, inner, types)?])),
        },
        TypeRef::Named(name) => coerce_input_scalar(name, value, types),
    }
}

fn coerce_input_scalar(type_name: &str, value: &Value, types: &TypesMap) -> Result<Value, String> {
    match types.get(type_name).map(|t| t.kind()) {
        None => return Err(format!("Unknown type \"{type_name}\".")),
        Some(TypeKind::Scalar) => (),
        Some(kind) => {
            return Err(format!(
                "\"{type_name}\" is an {} type and cannot be used as input.",
                kind.as_str(),
            ));
        },
    }
    match (type_name, value) {
        ("Int", Value::Int(i)) => int_in_range(*i).map(Value::Int),
        ("Int", other) => Err(format!("Int cannot represent non-integer value: {other}")),
        ("Float", Value::Int(i)) => Ok(Value::Float(*i as f64)),
        ("Float", Value::Float(f)) if f.is_finite() => Ok(Value::Float(*f)),
        ("Float", other) => Err(format!("Float cannot represent non numeric value: {other}")),
        ("String", Value::String(s)) => Ok(Value::String(s.clone())),
        ("String", other) => Err(format!("String cannot represent a non string value: {other}")),
        ("Boolean", Value::Boolean(b)) => Ok(Value::Boolean(*b)),
        ("Boolean", other) => {
            Err(format!("Boolean cannot represent a non boolean value: {other}"))
        },
        ("ID", Value::String(s)) => Ok(Value::String(s.clone())),
        ("ID", Value::Int(i)) => Ok(Value::String(i.to_string())),
        ("ID", other) => Err(format!("ID cannot represent value: {other}")),
        (_, other) => Ok(other.clone()),
    }
}

fn int_in_range(value: i64) -> Result<i64, String> {
    if i32::try_from(value).is_ok() {
        Ok(value)
    } else {
        Err(format!("Int cannot represent non 32-bit signed integer value: {value}"))
    }
}

/// Checks that a document literal can be coerced to `ty`. Variable
/// references are accepted here; their types are checked separately.
pub(crate) fn literal_error(literal: &ast::Value, ty: &TypeRef, types: &TypesMap) -> Option<String> {
    if let ast::Value::Variable(_) = literal {
        return None;
    }
    match ty {
        TypeRef::NonNull(inner) => match literal {
            ast::Value::Null => Some(format!("Expected value of type \"{ty}\", found null.")),
            _ => literal_error(literal, inner, types),
        },
        _ if matches!(literal, ast::Value::Null) => None,
        TypeRef::List(inner) => match literal {
            ast::Value::List(items) => items
                .iter()
                .find_map(|item| literal_error(item, inner, types)),
            single => literal_error(single, inner, types),
        },
        TypeRef::Named(name) => {
            if !is_builtin_scalar(name) && !literal.is_const() {
                // Custom scalars take any shape, but nested variables still
                // need a value at execution time.
                return None;
            }
            coerce_input_scalar(name, &Value::from_const_ast(literal), types)
                .err()
                .map(|reason| match literal {
                    ast::Value::Enum(_) | ast::Value::List(_) | ast::Value::Object(_)
                        if is_builtin_scalar(name) =>
                    {
                        format!(
                            "Expected value of type \"{name}\", found {}.",
                            literal.to_source_string(),
                        )
                    },
                    _ => reason,
                })
        },
    }
}

/// Serializes a resolved leaf value as the scalar `type_name`.
pub(crate) fn coerce_output_scalar(type_name: &str, value: FieldValue) -> Result<Value, String> {
    let value = field_value_to_value(value).ok_or_else(|| {
        format!("Expected a value of scalar type \"{type_name}\" but received an object.")
    })?;
    match (type_name, value) {
        ("Int", Value::Int(i)) => int_in_range(i).map(Value::Int),
        ("Int", Value::Float(f))
            if f.fract() == 0.0 && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) =>
        {
            Ok(Value::Int(f as i64))
        },
        ("Int", other) => Err(format!("Int cannot represent non-integer value: {other}")),
        ("Float", Value::Int(i)) => Ok(Value::Float(i as f64)),
        ("Float", Value::Float(f)) if f.is_finite() => Ok(Value::Float(f)),
        ("Float", other) => Err(format!("Float cannot represent non numeric value: {other}")),
        ("String", Value::String(s) | Value::Enum(s)) => Ok(Value::String(s)),
        ("String", Value::Boolean(b)) => Ok(Value::String(b.to_string())),
        ("String", Value::Int(i)) => Ok(Value::String(i.to_string())),
        ("String", Value::Float(f)) => Ok(Value::String(f.to_string())),
        ("String", other) => Err(format!("String cannot represent value: {other}")),
        ("Boolean", Value::Boolean(b)) => Ok(Value::Boolean(b)),
        ("Boolean", other) => {
            Err(format!("Boolean cannot represent a non boolean value: {other}"))
        },
        ("ID", Value::String(s)) => Ok(Value::String(s)),
        ("ID", Value::Int(i)) => Ok(Value::String(i.to_string())),
        ("ID", other) => Err(format!("ID cannot represent value: {other}")),
        (_, other) => Ok(other),
    }
}

fn field_value_to_value(value: FieldValue) -> Option<Value> {
    match value {
        FieldValue::Null => Some(Value::Null),
        FieldValue::Scalar(value) => Some(value),
        FieldValue::List(items) => items
            .into_iter()
            .map(field_value_to_value)
            .collect::<Option<Vec<_>>>()
            .map(Value::List),
        FieldValue::Object(object) => object.properties().and_then(|properties| {
            properties
                .iter()
                .map(|(key, value)| field_value_to_value(value.clone()).map(|v| (key.clone(), v)))
                .collect::<Option<_>>()
                .map(Value::Object)
        }),
    }
}

pub(crate) fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}
