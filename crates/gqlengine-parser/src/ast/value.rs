use crate::ast::ast_node::append_string_literal;
use crate::ast::AstNode;
use inherent::inherent;

/// An input value literal as written in a document.
///
/// Object fields keep their source order. `Variable` only appears in
/// non-const positions (field and directive arguments of executable
/// documents).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    Enum(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
    Variable(String),
}

impl Value {
    /// Returns `true` if no variable reference appears anywhere in this value.
    pub fn is_const(&self) -> bool {
        match self {
            Value::Variable(_) => false,
            Value::List(items) => items.iter().all(Value::is_const),
            Value::Object(fields) => fields.iter().all(|(_, value)| value.is_const()),
            _ => true,
        }
    }

    /// Pushes the name of every variable referenced in this value.
    pub fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Value::Variable(name) => out.push(name),
            Value::List(items) => {
                for item in items {
                    item.collect_variables(out);
                }
            },
            Value::Object(fields) => {
                for (_, value) in fields {
                    value.collect_variables(out);
                }
            },
            _ => (),
        }
    }
}

#[inherent]
impl AstNode for Value {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        match self {
            Value::Null => sink.push_str("null"),
            Value::Boolean(true) => sink.push_str("true"),
            Value::Boolean(false) => sink.push_str("false"),
            Value::Int(value) => sink.push_str(&value.to_string()),
            // `{:?}` always keeps a `.` or exponent, so the literal re-lexes
            // as a float.
            Value::Float(value) => sink.push_str(&format!("{value:?}")),
            Value::String(value) => append_string_literal(value, sink),
            Value::Enum(name) => sink.push_str(name),
            Value::List(items) => {
                sink.push('[');
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        sink.push_str(", ");
                    }
                    item.append_source(sink);
                }
                sink.push(']');
            },
            Value::Object(fields) => {
                sink.push('{');
                for (idx, (name, value)) in fields.iter().enumerate() {
                    if idx > 0 {
                        sink.push_str(", ");
                    }
                    sink.push_str(name);
                    sink.push_str(": ");
                    value.append_source(sink);
                }
                sink.push('}');
            },
            Value::Variable(name) => {
                sink.push('$');
                sink.push_str(name);
            },
        }
    }
}
