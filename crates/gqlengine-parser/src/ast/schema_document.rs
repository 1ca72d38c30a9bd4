//! Type system definitions for the SDL subset understood by the engine:
//! `schema`, `scalar`, `type`, `interface` and `union`.

use crate::ast::ast_node::append_string_literal;
use crate::ast::argument::append_directives;
use crate::ast::AstNode;
use crate::ast::AstPos;
use crate::ast::Directive;
use crate::ast::OperationKind;
use crate::ast::TypeAnnotation;
use crate::ast::Value;
use inherent::inherent;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaDocument {
    pub definitions: Vec<TypeSystemDefinition>,
}

#[inherent]
impl AstNode for SchemaDocument {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        for (idx, def) in self.definitions.iter().enumerate() {
            if idx > 0 {
                sink.push_str("\n\n");
            }
            def.append_source(sink);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeSystemDefinition {
    Schema(SchemaDefinition),
    Scalar(ScalarTypeDefinition),
    Object(ObjectTypeDefinition),
    Interface(InterfaceTypeDefinition),
    Union(UnionTypeDefinition),
}

#[inherent]
impl AstNode for TypeSystemDefinition {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        match self {
            TypeSystemDefinition::Schema(def) => def.append_source(sink),
            TypeSystemDefinition::Scalar(def) => def.append_source(sink),
            TypeSystemDefinition::Object(def) => def.append_source(sink),
            TypeSystemDefinition::Interface(def) => def.append_source(sink),
            TypeSystemDefinition::Union(def) => def.append_source(sink),
        }
    }
}

/// `schema { query: Query mutation: Mutation }`
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaDefinition {
    pub root_operations: Vec<(OperationKind, String)>,
    pub directives: Vec<Directive>,
    pub position: AstPos,
}

impl SchemaDefinition {
    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        self.root_operations
            .iter()
            .find(|(op_kind, _)| *op_kind == kind)
            .map(|(_, name)| name.as_str())
    }
}

#[inherent]
impl AstNode for SchemaDefinition {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        sink.push_str("schema");
        append_directives(&self.directives, sink);
        sink.push_str(" {");
        for (kind, name) in &self.root_operations {
            sink.push(' ');
            sink.push_str(kind.as_str());
            sink.push_str(": ");
            sink.push_str(name);
        }
        sink.push_str(" }");
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScalarTypeDefinition {
    pub description: Option<String>,
    pub name: String,
    pub directives: Vec<Directive>,
    pub position: AstPos,
}

#[inherent]
impl AstNode for ScalarTypeDefinition {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        append_description(self.description.as_deref(), sink);
        sink.push_str("scalar ");
        sink.push_str(&self.name);
        append_directives(&self.directives, sink);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectTypeDefinition {
    pub description: Option<String>,
    pub name: String,
    pub implements: Vec<String>,
    pub directives: Vec<Directive>,
    pub fields: Vec<FieldDefinition>,
    pub position: AstPos,
}

#[inherent]
impl AstNode for ObjectTypeDefinition {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        append_description(self.description.as_deref(), sink);
        sink.push_str("type ");
        append_composite_body(
            &self.name,
            &self.implements,
            &self.directives,
            &self.fields,
            sink,
        );
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceTypeDefinition {
    pub description: Option<String>,
    pub name: String,
    pub implements: Vec<String>,
    pub directives: Vec<Directive>,
    pub fields: Vec<FieldDefinition>,
    pub position: AstPos,
}

#[inherent]
impl AstNode for InterfaceTypeDefinition {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        append_description(self.description.as_deref(), sink);
        sink.push_str("interface ");
        append_composite_body(
            &self.name,
            &self.implements,
            &self.directives,
            &self.fields,
            sink,
        );
    }
}

/// `union SearchResult = User | Post`
#[derive(Clone, Debug, PartialEq)]
pub struct UnionTypeDefinition {
    pub description: Option<String>,
    pub name: String,
    pub directives: Vec<Directive>,
    pub members: Vec<String>,
    pub position: AstPos,
}

#[inherent]
impl AstNode for UnionTypeDefinition {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        append_description(self.description.as_deref(), sink);
        sink.push_str("union ");
        sink.push_str(&self.name);
        append_directives(&self.directives, sink);
        if !self.members.is_empty() {
            sink.push_str(" = ");
            sink.push_str(&self.members.join(" | "));
        }
    }
}

/// `name(arg: Type = default): Type @directives`
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDefinition {
    pub description: Option<String>,
    pub name: String,
    pub arguments: Vec<InputValueDefinition>,
    pub field_type: TypeAnnotation,
    pub directives: Vec<Directive>,
    pub position: AstPos,
}

#[inherent]
impl AstNode for FieldDefinition {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        append_description(self.description.as_deref(), sink);
        sink.push_str(&self.name);
        if !self.arguments.is_empty() {
            sink.push('(');
            for (idx, arg) in self.arguments.iter().enumerate() {
                if idx > 0 {
                    sink.push_str(", ");
                }
                arg.append_source(sink);
            }
            sink.push(')');
        }
        sink.push_str(": ");
        self.field_type.append_source(sink);
        append_directives(&self.directives, sink);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputValueDefinition {
    pub description: Option<String>,
    pub name: String,
    pub value_type: TypeAnnotation,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
    pub position: AstPos,
}

#[inherent]
impl AstNode for InputValueDefinition {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        append_description(self.description.as_deref(), sink);
        sink.push_str(&self.name);
        sink.push_str(": ");
        self.value_type.append_source(sink);
        if let Some(default_value) = &self.default_value {
            sink.push_str(" = ");
            default_value.append_source(sink);
        }
        append_directives(&self.directives, sink);
    }
}

fn append_description(description: Option<&str>, sink: &mut String) {
    if let Some(description) = description {
        append_string_literal(description, sink);
        sink.push(' ');
    }
}

fn append_composite_body(
    name: &str,
    implements: &[String],
    directives: &[Directive],
    fields: &[FieldDefinition],
    sink: &mut String,
) {
    sink.push_str(name);
    if !implements.is_empty() {
        sink.push_str(" implements ");
        sink.push_str(&implements.join(" & "));
    }
    append_directives(directives, sink);
    if !fields.is_empty() {
        sink.push_str(" {");
        for field in fields {
            sink.push(' ');
            field.append_source(sink);
        }
        sink.push_str(" }");
    }
}
