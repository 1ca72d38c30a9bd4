use crate::ast::AstNode;
use crate::ast::FragmentDefinition;
use crate::ast::OperationDefinition;
use inherent::inherent;

/// A parsed executable document: operations and fragments in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

impl Document {
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Operation(op) => Some(op),
            Definition::Fragment(_) => None,
        })
    }

    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Fragment(frag) => Some(frag),
            Definition::Operation(_) => None,
        })
    }

    /// Returns the first fragment definition with the given name.
    pub fn fragment_named(&self, name: &str) -> Option<&FragmentDefinition> {
        self.fragments().find(|frag| frag.name == name)
    }
}

#[inherent]
impl AstNode for Document {
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
pub enum Definition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}

#[inherent]
impl AstNode for Definition {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        match self {
            Definition::Operation(op) => op.append_source(sink),
            Definition::Fragment(frag) => frag.append_source(sink),
        }
    }
}
