use crate::ast::argument::append_arguments;
use crate::ast::argument::append_directives;
use crate::ast::Argument;
use crate::ast::AstNode;
use crate::ast::AstPos;
use crate::ast::Directive;
use inherent::inherent;

/// A `{ ... }` block of selections. Never empty once parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionSet {
    pub items: Vec<Selection>,
    pub position: AstPos,
}

#[inherent]
impl AstNode for SelectionSet {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        sink.push('{');
        for item in &self.items {
            sink.push(' ');
            item.append_source(sink);
        }
        sink.push_str(" }");
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

impl Selection {
    pub fn directives(&self) -> &[Directive] {
        match self {
            Selection::Field(field) => &field.directives,
            Selection::FragmentSpread(spread) => &spread.directives,
            Selection::InlineFragment(fragment) => &fragment.directives,
        }
    }

    pub fn position(&self) -> AstPos {
        match self {
            Selection::Field(field) => field.position,
            Selection::FragmentSpread(spread) => spread.position,
            Selection::InlineFragment(fragment) => fragment.position,
        }
    }
}

#[inherent]
impl AstNode for Selection {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        match self {
            Selection::Field(field) => field.append_source(sink),
            Selection::FragmentSpread(spread) => spread.append_source(sink),
            Selection::InlineFragment(fragment) => fragment.append_source(sink),
        }
    }
}

/// A field selection, optionally aliased, with arguments, directives,
/// and a nested selection set.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<Argument>,
    pub directives: Vec<Directive>,
    pub selection_set: Option<SelectionSet>,
    pub position: AstPos,
}

impl Field {
    /// The key this field's value is stored under in the response: the alias
    /// if present, otherwise the field name.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|arg| arg.name == name)
    }
}

#[inherent]
impl AstNode for Field {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        if let Some(alias) = &self.alias {
            sink.push_str(alias);
            sink.push_str(": ");
        }
        sink.push_str(&self.name);
        append_arguments(&self.arguments, sink);
        append_directives(&self.directives, sink);
        if let Some(selection_set) = &self.selection_set {
            sink.push(' ');
            selection_set.append_source(sink);
        }
    }
}

/// `...FragmentName @directives`
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentSpread {
    pub fragment_name: String,
    pub directives: Vec<Directive>,
    pub position: AstPos,
}

#[inherent]
impl AstNode for FragmentSpread {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        sink.push_str("...");
        sink.push_str(&self.fragment_name);
        append_directives(&self.directives, sink);
    }
}

/// `... on Type @directives { ... }` or `... @directives { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct InlineFragment {
    pub type_condition: Option<String>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub position: AstPos,
}

#[inherent]
impl AstNode for InlineFragment {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        sink.push_str("...");
        if let Some(type_condition) = &self.type_condition {
            sink.push_str(" on ");
            sink.push_str(type_condition);
        }
        append_directives(&self.directives, sink);
        sink.push(' ');
        self.selection_set.append_source(sink);
    }
}
