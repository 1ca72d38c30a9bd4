use crate::ast::ast_node::append_joined;
use crate::ast::AstNode;
use crate::ast::AstPos;
use crate::ast::Value;
use inherent::inherent;

/// A `name: value` pair in a field or directive argument list.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
    pub position: AstPos,
}

#[inherent]
impl AstNode for Argument {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        sink.push_str(&self.name);
        sink.push_str(": ");
        self.value.append_source(sink);
    }
}

/// A directive annotation such as `@skip(if: $hide)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub position: AstPos,
}

impl Directive {
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|arg| arg.name == name)
    }
}

#[inherent]
impl AstNode for Directive {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        sink.push('@');
        sink.push_str(&self.name);
        append_arguments(&self.arguments, sink);
    }
}

/// Appends `(a: 1, b: 2)`, or nothing for an empty list.
pub(crate) fn append_arguments(arguments: &[Argument], sink: &mut String) {
    if arguments.is_empty() {
        return;
    }
    sink.push('(');
    append_joined(arguments, ", ", sink);
    sink.push(')');
}

/// Appends ` @a @b(x: 1)`, each directive preceded by a space.
pub(crate) fn append_directives(directives: &[Directive], sink: &mut String) {
    for directive in directives {
        sink.push(' ');
        directive.append_source(sink);
    }
}
