use crate::coercion::BUILTIN_SCALARS;
use crate::resolver::Resolver;
use crate::schema::schema_type_validator::SchemaTypeValidator;
use crate::schema::InterfaceTypeBuilder;
use crate::schema::ObjectTypeBuilder;
use crate::schema::Schema;
use crate::schema::SchemaBuildError;
use crate::schema::UnionTypeBuilder;
use crate::types::SchemaType;
use crate::types::TypeKind;
use crate::types::TypesMap;
use gqlengine_parser::ast;
use gqlengine_parser::ast::OperationKind;
use gqlengine_parser::GraphQLParseError;
use gqlengine_parser::GraphQLParser;
use inherent::inherent;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

type Result<T> = std::result::Result<T, SchemaBuildError>;

/// Utility for building a [`Schema`] from SDL, from type builders, or both.
///
/// Structural problems are collected and reported together by
/// [`build()`](SchemaBuilder::build); only SDL syntax errors and unreadable
/// files fail early.
pub struct SchemaBuilder {
    types: TypesMap,
    errors: Vec<SchemaBuildError>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    resolvers: Vec<(String, String, Arc<dyn Resolver>)>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        let mut types = TypesMap::new();
        for name in BUILTIN_SCALARS {
            types.insert(name.to_string(), SchemaType::new(name, TypeKind::Scalar));
        }
        Self {
            types,
            errors: vec![],
            query_type: None,
            mutation_type: None,
            resolvers: vec![],
        }
    }

    pub fn build(self) -> std::result::Result<Schema, Vec<SchemaBuildError>> {
        let Self {
            mut types,
            mut errors,
            query_type,
            mutation_type,
            resolvers,
        } = self;

        for schema_type in types.values() {
            errors.append(&mut SchemaTypeValidator::new(schema_type, &types).validate());
        }

        // Each object is a possible type of itself and of every interface it
        // implements.
        let mut implementations = vec![];
        for schema_type in types.values().filter(|t| t.kind == TypeKind::Object) {
            for iface_name in &schema_type.interfaces {
                implementations.push((iface_name.clone(), schema_type.name.clone()));
            }
        }
        for (iface_name, object_name) in implementations {
            if let Some(iface) = types.get_mut(&iface_name)
                && iface.kind == TypeKind::Interface
            {
                iface.possible_types.push(object_name);
            }
        }
        for schema_type in types.values_mut().filter(|t| t.kind == TypeKind::Object) {
            schema_type.possible_types = vec![schema_type.name.clone()];
        }

        let query_type_index = match query_type {
            Some(name) => root_type_index(&types, OperationKind::Query, &name, &mut errors),
            None => match types.get_full("Query") {
                Some((idx, _, query)) if query.kind == TypeKind::Object => Some(idx),
                Some((_, _, query)) => {
                    errors.push(SchemaBuildError::InvalidRootOperationTypeKind {
                        operation: OperationKind::Query,
                        type_name: query.name.clone(),
                        kind: query.kind,
                    });
                    None
                },
                None => {
                    errors.push(SchemaBuildError::NoQueryOperationTypeDefined {
                        type_name: "Query".to_string(),
                    });
                    None
                },
            },
        };
        let mutation_type_index = match mutation_type {
            Some(name) => root_type_index(&types, OperationKind::Mutation, &name, &mut errors),
            None => match types.get_full("Mutation") {
                Some((idx, _, mutation)) if mutation.kind == TypeKind::Object => Some(idx),
                _ => None,
            },
        };

        let mut resolver_map: HashMap<String, HashMap<String, Arc<dyn Resolver>>> =
            HashMap::new();
        for (type_name, field_name, resolver) in resolvers {
            match types.get(&type_name) {
                Some(owner) if owner.kind != TypeKind::Object => {
                    errors.push(SchemaBuildError::ResolverOnNonObjectType { type_name, field_name });
                    continue;
                },
                Some(owner) if owner.fields.contains_key(&field_name) => (),
                _ => {
                    errors.push(SchemaBuildError::ResolverOnUndefinedField { type_name, field_name });
                    continue;
                },
            }
            let fields = resolver_map.entry(type_name.clone()).or_default();
            if fields.contains_key(&field_name) {
                errors.push(SchemaBuildError::DuplicateResolverBinding { type_name, field_name });
                continue;
            }
            fields.insert(field_name, resolver);
        }

        match query_type_index {
            Some(query_type_index) if errors.is_empty() => {
                debug!(
                    types = types.len(),
                    resolvers = resolver_map.values().map(HashMap::len).sum::<usize>(),
                    "built schema",
                );
                Ok(Schema {
                    types,
                    query_type_index,
                    mutation_type_index,
                    resolvers: resolver_map,
                })
            },
            _ => Err(errors),
        }
    }

    /// Registers the types and root operation names of an SDL document.
    pub fn load_str(self, sdl: &str) -> Result<Self> {
        let document = GraphQLParser::new(sdl)
            .parse_schema_document()
            .map_err(|err| parse_error("<schema>", &err))?;
        Ok(self.load_document(&document))
    }

    pub fn load_file(self, file_path: impl AsRef<Path>) -> Result<Self> {
        let file_path = file_path.as_ref();
        let content = std::fs::read_to_string(file_path).map_err(|err| {
            SchemaBuildError::SchemaFileReadError {
                path: file_path.to_path_buf(),
                message: err.to_string(),
            }
        })?;
        let document = GraphQLParser::with_file_path(&content, file_path)
            .parse_schema_document()
            .map_err(|err| parse_error(&file_path.display().to_string(), &err))?;
        Ok(self.load_document(&document))
    }

    pub fn load_document(mut self, document: &ast::SchemaDocument) -> Self {
        for def in &document.definitions {
            match def {
                ast::TypeSystemDefinition::Schema(schema_def) => {
                    for (kind, type_name) in &schema_def.root_operations {
                        self.set_root_type(*kind, type_name.clone());
                    }
                },
                ast::TypeSystemDefinition::Scalar(scalar_def) => {
                    let mut scalar = SchemaType::new(scalar_def.name.clone(), TypeKind::Scalar);
                    scalar.description = scalar_def.description.clone();
                    self.add_type(scalar, vec![]);
                },
                ast::TypeSystemDefinition::Object(object_def) => {
                    let (object, errors) = ObjectTypeBuilder::from_sdl(object_def).into_schema_type();
                    self.add_type(object, errors);
                },
                ast::TypeSystemDefinition::Interface(iface_def) => {
                    let (iface, errors) =
                        InterfaceTypeBuilder::from_sdl(iface_def).into_schema_type();
                    self.add_type(iface, errors);
                },
                ast::TypeSystemDefinition::Union(union_def) => {
                    let (union, errors) = UnionTypeBuilder::from_sdl(union_def).into_schema_type();
                    self.add_type(union, errors);
                },
            }
        }
        self
    }

    pub fn object(mut self, builder: ObjectTypeBuilder) -> Self {
        let (object, errors) = builder.into_schema_type();
        self.add_type(object, errors);
        self
    }

    pub fn interface(mut self, builder: InterfaceTypeBuilder) -> Self {
        let (iface, errors) = builder.into_schema_type();
        self.add_type(iface, errors);
        self
    }

    pub fn union(mut self, builder: UnionTypeBuilder) -> Self {
        let (union, errors) = builder.into_schema_type();
        self.add_type(union, errors);
        self
    }

    /// Declares a custom scalar. Its values pass through unchanged.
    pub fn scalar(mut self, name: impl Into<String>) -> Self {
        self.add_type(SchemaType::new(name, TypeKind::Scalar), vec![]);
        self
    }

    /// Names the query root type. Defaults to `Query`.
    pub fn query_type(mut self, type_name: impl Into<String>) -> Self {
        self.set_root_type(OperationKind::Query, type_name.into());
        self
    }

    /// Names the mutation root type. Defaults to `Mutation` when such an
    /// object type exists.
    pub fn mutation_type(mut self, type_name: impl Into<String>) -> Self {
        self.set_root_type(OperationKind::Mutation, type_name.into());
        self
    }

    /// Binds `resolver` to the `type_name.field_name` field.
    pub fn resolver(
        mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        resolver: impl Resolver + 'static,
    ) -> Self {
        self.resolvers.push((type_name.into(), field_name.into(), Arc::new(resolver)));
        self
    }

    fn add_type(&mut self, schema_type: SchemaType, mut errors: Vec<SchemaBuildError>) {
        self.errors.append(&mut errors);
        if schema_type.name.starts_with("__") {
            self.errors.push(SchemaBuildError::ReservedName {
                name: schema_type.name,
            });
            return;
        }
        if self.types.contains_key(&schema_type.name) {
            self.errors.push(SchemaBuildError::DuplicateTypeDefinition {
                type_name: schema_type.name,
            });
            return;
        }
        self.types.insert(schema_type.name.clone(), schema_type);
    }

    fn set_root_type(&mut self, kind: OperationKind, type_name: String) {
        let slot = match kind {
            OperationKind::Query => &mut self.query_type,
            OperationKind::Mutation => &mut self.mutation_type,
        };
        if slot.is_some() {
            self.errors.push(SchemaBuildError::DuplicateOperationDefinition { operation: kind });
        } else {
            *slot = Some(type_name);
        }
    }
}

#[inherent]
impl FromStr for SchemaBuilder {
    type Err = SchemaBuildError;

    /// Equivalent to `SchemaBuilder::new().load_str(sdl)`.
    pub fn from_str(sdl: &str) -> Result<Self> {
        SchemaBuilder::new().load_str(sdl)
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field("errors", &self.errors)
            .field("query_type", &self.query_type)
            .field("mutation_type", &self.mutation_type)
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

fn root_type_index(
    types: &TypesMap,
    operation: OperationKind,
    type_name: &str,
    errors: &mut Vec<SchemaBuildError>,
) -> Option<usize> {
    match types.get_full(type_name) {
        Some((idx, _, root)) if root.kind == TypeKind::Object => Some(idx),
        Some((_, _, root)) => {
            errors.push(SchemaBuildError::InvalidRootOperationTypeKind {
                operation,
                type_name: type_name.to_string(),
                kind: root.kind,
            });
            None
        },
        None => {
            errors.push(SchemaBuildError::UndefinedRootOperationType {
                operation,
                type_name: type_name.to_string(),
            });
            None
        },
    }
}

fn parse_error(source_name: &str, err: &GraphQLParseError) -> SchemaBuildError {
    SchemaBuildError::ParseError {
        source_name: source_name.to_string(),
        line: err.line(),
        column: err.column(),
        message: err.message().to_string(),
    }
}
