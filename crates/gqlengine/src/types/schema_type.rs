use crate::types::TypeRef;
use crate::Value;
use indexmap::IndexMap;

/// The kinds of named types a schema can hold.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    Scalar,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Object => "object",
            TypeKind::Interface => "interface",
            TypeKind::Union => "union",
            TypeKind::Scalar => "scalar",
        }
    }
}

/// A named type registered in a [`Schema`](crate::schema::Schema).
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaType {
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) description: Option<String>,
    pub(crate) fields: IndexMap<String, FieldDefinition>,
    pub(crate) interfaces: Vec<String>,
    pub(crate) possible_types: Vec<String>,
}

impl SchemaType {
    pub(crate) fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            fields: IndexMap::new(),
            interfaces: vec![],
            possible_types: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fields in declaration order. Always empty for unions and scalars.
    pub fn fields(&self) -> &IndexMap<String, FieldDefinition> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Names of the interfaces this object or interface type implements.
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// For interfaces and unions, the concrete object types that may appear
    /// where this type is expected.
    pub fn possible_types(&self) -> &[String] {
        &self.possible_types
    }

    pub fn is_composite(&self) -> bool {
        !self.is_leaf()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, TypeKind::Scalar)
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::Interface | TypeKind::Union)
    }

    pub fn is_input_type(&self) -> bool {
        self.is_leaf()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDefinition {
    pub(crate) name: String,
    pub(crate) field_type: TypeRef,
    pub(crate) arguments: IndexMap<String, ArgumentDefinition>,
    pub(crate) description: Option<String>,
}

impl FieldDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &TypeRef {
        &self.field_type
    }

    pub fn arguments(&self) -> &IndexMap<String, ArgumentDefinition> {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentDefinition> {
        self.arguments.get(name)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArgumentDefinition {
    pub(crate) name: String,
    pub(crate) value_type: TypeRef,
    pub(crate) default_value: Option<Value>,
}

impl ArgumentDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &TypeRef {
        &self.value_type
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Required arguments are non-null and have no default.
    pub fn is_required(&self) -> bool {
        self.value_type.is_non_null() && self.default_value.is_none()
    }
}
