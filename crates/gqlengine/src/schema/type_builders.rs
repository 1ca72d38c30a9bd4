use crate::schema::SchemaBuildError;
use crate::types::ArgumentDefinition;
use crate::types::FieldDefinition;
use crate::types::SchemaType;
use crate::types::TypeKind;
use crate::types::TypeRef;
use crate::Value;
use gqlengine_parser::ast;
use indexmap::IndexMap;

/// Describes one field of an object or interface type in code.
///
/// Types are written as GraphQL type strings (`"[User!]!"`); malformed
/// strings are reported when the schema is built.
#[derive(Clone, Debug)]
pub struct FieldBuilder {
    name: String,
    field_type: TypeSpec,
    description: Option<String>,
    arguments: Vec<ArgumentSpec>,
}

#[derive(Clone, Debug)]
struct ArgumentSpec {
    name: String,
    value_type: TypeSpec,
    default_value: Option<Value>,
}

/// A type written in code (parsed at build time) or already parsed from SDL.
#[derive(Clone, Debug)]
enum TypeSpec {
    Source(String),
    Parsed(TypeRef),
}

impl FieldBuilder {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: TypeSpec::Source(field_type.into()),
            description: None,
            arguments: vec![],
        }
    }

    pub(crate) fn from_sdl(def: &ast::FieldDefinition) -> Self {
        Self {
            name: def.name.clone(),
            field_type: TypeSpec::Parsed(TypeRef::from(&def.field_type)),
            description: def.description.clone(),
            arguments: def
                .arguments
                .iter()
                .map(|arg| ArgumentSpec {
                    name: arg.name.clone(),
                    value_type: TypeSpec::Parsed(TypeRef::from(&arg.value_type)),
                    default_value: arg.default_value.as_ref().map(Value::from_const_ast),
                })
                .collect(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, name: impl Into<String>, value_type: impl Into<String>) -> Self {
        self.arguments.push(ArgumentSpec {
            name: name.into(),
            value_type: TypeSpec::Source(value_type.into()),
            default_value: None,
        });
        self
    }

    pub fn argument_with_default(
        mut self,
        name: impl Into<String>,
        value_type: impl Into<String>,
        default_value: impl Into<Value>,
    ) -> Self {
        self.arguments.push(ArgumentSpec {
            name: name.into(),
            value_type: TypeSpec::Source(value_type.into()),
            default_value: Some(default_value.into()),
        });
        self
    }

    fn build(self, type_name: &str, errors: &mut Vec<SchemaBuildError>) -> Option<FieldDefinition> {
        let field_type = parse_type(type_name, &self.name, &self.field_type, errors)?;
        let mut arguments = IndexMap::new();
        for arg in self.arguments {
            let Some(value_type) = parse_type(type_name, &self.name, &arg.value_type, errors) else {
                continue;
            };
            if arguments.contains_key(&arg.name) {
                errors.push(SchemaBuildError::DuplicateArgumentDefinition {
                    type_name: type_name.to_string(),
                    field_name: self.name.clone(),
                    argument_name: arg.name,
                });
                continue;
            }
            arguments.insert(arg.name.clone(), ArgumentDefinition {
                name: arg.name,
                value_type,
                default_value: arg.default_value,
            });
        }
        Some(FieldDefinition {
            name: self.name,
            field_type,
            arguments,
            description: self.description,
        })
    }
}

fn parse_type(
    type_name: &str,
    field_name: &str,
    spec: &TypeSpec,
    errors: &mut Vec<SchemaBuildError>,
) -> Option<TypeRef> {
    let annotation = match spec {
        TypeSpec::Parsed(type_ref) => return Some(type_ref.clone()),
        TypeSpec::Source(annotation) => annotation,
    };
    match TypeRef::parse(annotation) {
        Ok(type_ref) => Some(type_ref),
        Err(err) => {
            errors.push(SchemaBuildError::InvalidTypeAnnotation {
                type_name: type_name.to_string(),
                field_name: field_name.to_string(),
                annotation: annotation.clone(),
                message: err.message().to_string(),
            });
            None
        },
    }
}

/// Fields and `implements` shared by object and interface builders.
#[derive(Clone, Debug)]
struct FieldsContainer {
    name: String,
    description: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<FieldBuilder>,
}

impl FieldsContainer {
    fn new(name: String) -> Self {
        Self {
            name,
            description: None,
            interfaces: vec![],
            fields: vec![],
        }
    }

    fn into_schema_type(self, kind: TypeKind) -> (SchemaType, Vec<SchemaBuildError>) {
        let mut errors = vec![];
        let mut schema_type = SchemaType::new(self.name, kind);
        schema_type.description = self.description;
        for iface_name in self.interfaces {
            if schema_type.interfaces.contains(&iface_name) {
                errors.push(SchemaBuildError::DuplicateInterfaceImplementsDeclaration {
                    type_name: schema_type.name.clone(),
                    interface_name: iface_name,
                });
            } else {
                schema_type.interfaces.push(iface_name);
            }
        }
        for field in self.fields {
            let Some(field_def) = field.build(&schema_type.name, &mut errors) else {
                continue;
            };
            if schema_type.fields.contains_key(&field_def.name) {
                errors.push(SchemaBuildError::DuplicateFieldDefinition {
                    type_name: schema_type.name.clone(),
                    field_name: field_def.name,
                });
                continue;
            }
            schema_type.fields.insert(field_def.name.clone(), field_def);
        }
        (schema_type, errors)
    }
}

#[derive(Clone, Debug)]
pub struct ObjectTypeBuilder(FieldsContainer);

impl ObjectTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self(FieldsContainer::new(name.into()))
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    pub fn implements(mut self, interface_name: impl Into<String>) -> Self {
        self.0.interfaces.push(interface_name.into());
        self
    }

    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.0.fields.push(field);
        self
    }

    pub(crate) fn from_sdl(def: &ast::ObjectTypeDefinition) -> Self {
        Self(FieldsContainer {
            name: def.name.clone(),
            description: def.description.clone(),
            interfaces: def.implements.clone(),
            fields: def.fields.iter().map(FieldBuilder::from_sdl).collect(),
        })
    }

    pub(crate) fn into_schema_type(self) -> (SchemaType, Vec<SchemaBuildError>) {
        self.0.into_schema_type(TypeKind::Object)
    }
}

#[derive(Clone, Debug)]
pub struct InterfaceTypeBuilder(FieldsContainer);

impl InterfaceTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self(FieldsContainer::new(name.into()))
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    /// Interfaces may themselves implement interfaces.
    pub fn implements(mut self, interface_name: impl Into<String>) -> Self {
        self.0.interfaces.push(interface_name.into());
        self
    }

    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.0.fields.push(field);
        self
    }

    pub(crate) fn from_sdl(def: &ast::InterfaceTypeDefinition) -> Self {
        Self(FieldsContainer {
            name: def.name.clone(),
            description: def.description.clone(),
            interfaces: def.implements.clone(),
            fields: def.fields.iter().map(FieldBuilder::from_sdl).collect(),
        })
    }

    pub(crate) fn into_schema_type(self) -> (SchemaType, Vec<SchemaBuildError>) {
        self.0.into_schema_type(TypeKind::Interface)
    }
}

#[derive(Clone, Debug)]
pub struct UnionTypeBuilder {
    name: String,
    description: Option<String>,
    members: Vec<String>,
}

impl UnionTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            members: vec![],
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn member(mut self, type_name: impl Into<String>) -> Self {
        self.members.push(type_name.into());
        self
    }

    pub(crate) fn from_sdl(def: &ast::UnionTypeDefinition) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            members: def.members.clone(),
        }
    }

    pub(crate) fn into_schema_type(self) -> (SchemaType, Vec<SchemaBuildError>) {
        let mut errors = vec![];
        let mut schema_type = SchemaType::new(self.name, TypeKind::Union);
        schema_type.description = self.description;
        for member in self.members {
            if schema_type.possible_types.contains(&member) {
                errors.push(SchemaBuildError::DuplicatedUnionMember {
                    union_name: schema_type.name.clone(),
                    member_name: member,
                });
            } else {
                schema_type.possible_types.push(member);
            }
        }
        (schema_type, errors)
    }
}
