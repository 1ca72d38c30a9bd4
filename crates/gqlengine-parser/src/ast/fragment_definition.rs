use crate::ast::argument::append_directives;
use crate::ast::AstNode;
use crate::ast::AstPos;
use crate::ast::Directive;
use crate::ast::SelectionSet;
use inherent::inherent;

/// `fragment Name on Type @directives { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentDefinition {
    pub name: String,
    pub type_condition: String,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub position: AstPos,
}

#[inherent]
impl AstNode for FragmentDefinition {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        sink.push_str("fragment ");
        sink.push_str(&self.name);
        sink.push_str(" on ");
        sink.push_str(&self.type_condition);
        append_directives(&self.directives, sink);
        sink.push(' ');
        self.selection_set.append_source(sink);
    }
}
