use crate::ast::AstNode;
use inherent::inherent;
use std::fmt;

/// A type reference such as `String`, `[User!]` or `ID!`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TypeAnnotation {
    Named {
        name: String,
        nullable: bool,
    },
    List {
        inner: Box<TypeAnnotation>,
        nullable: bool,
    },
}

impl TypeAnnotation {
    pub fn named(name: impl Into<String>) -> Self {
        TypeAnnotation::Named {
            name: name.into(),
            nullable: true,
        }
    }

    pub fn list(inner: TypeAnnotation) -> Self {
        TypeAnnotation::List {
            inner: Box::new(inner),
            nullable: true,
        }
    }

    /// Returns this annotation with the outermost nullability removed.
    pub fn non_null(self) -> Self {
        match self {
            TypeAnnotation::Named { name, .. } => TypeAnnotation::Named {
                name,
                nullable: false,
            },
            TypeAnnotation::List { inner, .. } => TypeAnnotation::List {
                inner,
                nullable: false,
            },
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            TypeAnnotation::Named { nullable, .. }
            | TypeAnnotation::List { nullable, .. } => *nullable,
        }
    }

    /// The name of the innermost named type.
    pub fn innermost_name(&self) -> &str {
        match self {
            TypeAnnotation::Named { name, .. } => name,
            TypeAnnotation::List { inner, .. } => inner.innermost_name(),
        }
    }
}

#[inherent]
impl AstNode for TypeAnnotation {
    pub fn to_source_string(&self) -> String;

    pub fn append_source(&self, sink: &mut String) {
        match self {
            TypeAnnotation::Named { name, nullable } => {
                sink.push_str(name);
                if !nullable {
                    sink.push('!');
                }
            },
            TypeAnnotation::List { inner, nullable } => {
                sink.push('[');
                inner.append_source(sink);
                sink.push(']');
                if !nullable {
                    sink.push('!');
                }
            },
        }
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source_string())
    }
}
