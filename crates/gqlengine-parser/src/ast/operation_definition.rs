use crate::ast::argument::append_directives;
use crate::ast::AstNode;
use crate::ast::AstPos;
use crate::ast::Directive;
use crate::ast::SelectionSet;
use crate::ast::TypeAnnotation;
use crate::ast::Value;
use inherent::inherent;
use std::fmt;

/// The executable operation kinds. `subscription` is rejected by the parser.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OperationDefinition {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub variable_definitions: Vec<VariableDefinition>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub position: AstPos,
}

impl OperationDefinition {
    /// Whether this operation can be written with the `{ ... }` shorthand.
    pub fn is_shorthand(&self) -> bool {
        self.kind == OperationKind::Query
            && self.name.is_none()
            && self.variable_definitions.is_empty()
            && self.directives.is_empty()
    }

    pub fn variable_definition(&self, name: &str) -> Option<&VariableDefinition> {
        self.variable_definitions.iter().find(|def| def.name == name)
    }
}

#[inherent]
impl AstNode for OperationDefinition {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        if !self.is_shorthand() {
            sink.push_str(self.kind.as_str());
            if let Some(name) = &self.name {
                sink.push(' ');
                sink.push_str(name);
            }
            if !self.variable_definitions.is_empty() {
                sink.push('(');
                for (idx, def) in self.variable_definitions.iter().enumerate() {
                    if idx > 0 {
                        sink.push_str(", ");
                    }
                    def.append_source(sink);
                }
                sink.push(')');
            }
            append_directives(&self.directives, sink);
            sink.push(' ');
        }
        self.selection_set.append_source(sink);
    }
}

/// `$name: Type = default`
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition {
    pub name: String,
    pub var_type: TypeAnnotation,
    pub default_value: Option<Value>,
    pub position: AstPos,
}

#[inherent]
impl AstNode for VariableDefinition {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        sink.push('$');
        sink.push_str(&self.name);
        sink.push_str(": ");
        self.var_type.append_source(sink);
        if let Some(default_value) = &self.default_value {
            sink.push_str(" = ");
            default_value.append_source(sink);
        }
    }
}
