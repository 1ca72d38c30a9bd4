use gqlengine_parser::ast;
use std::fmt;

/// The declared type of a field, argument or variable: a named type,
/// optionally wrapped in any composition of "list of" and "non-null".
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        match inner {
            already @ TypeRef::NonNull(_) => already,
            inner => TypeRef::NonNull(Box::new(inner)),
        }
    }

    /// Parses a type string such as `[User!]!`.
    pub fn parse(source: &str) -> gqlengine_parser::ParseResult<Self> {
        gqlengine_parser::parse_type_annotation(source).map(|annot| TypeRef::from(&annot))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::List(_) => true,
            TypeRef::NonNull(inner) => inner.is_list(),
            TypeRef::Named(_) => false,
        }
    }

    /// This type with any outermost non-null wrapper removed.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    /// The name of the innermost named type.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    /// The element type if this is a (possibly non-null) list type.
    pub fn list_item(&self) -> Option<&TypeRef> {
        match self.nullable() {
            TypeRef::List(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<&ast::TypeAnnotation> for TypeRef {
    fn from(annot: &ast::TypeAnnotation) -> Self {
        let type_ref = match annot {
            ast::TypeAnnotation::Named { name, .. } => TypeRef::Named(name.clone()),
            ast::TypeAnnotation::List { inner, .. } => {
                TypeRef::List(Box::new(TypeRef::from(inner.as_ref())))
            },
        };
        if annot.is_nullable() {
            type_ref
        } else {
            TypeRef::NonNull(Box::new(type_ref))
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}
