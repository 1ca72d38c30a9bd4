//! The schema registry: named types, their fields and the resolvers bound to
//! them. A [`Schema`] is built once with a [`SchemaBuilder`] and is immutable
//! afterwards; share it behind an `Arc`.

mod schema_build_error;
mod schema_builder;
mod schema_type_validator;
mod type_builders;

pub use schema_build_error::SchemaBuildError;
pub use schema_builder::SchemaBuilder;
pub use type_builders::FieldBuilder;
pub use type_builders::InterfaceTypeBuilder;
pub use type_builders::ObjectTypeBuilder;
pub use type_builders::UnionTypeBuilder;

use crate::resolver::Resolver;
use crate::types::FieldDefinition;
use crate::types::SchemaType;
use crate::types::TypeKind;
use crate::types::TypesMap;
use gqlengine_parser::ast::OperationKind;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type ResolverMap = HashMap<String, HashMap<String, Arc<dyn Resolver>>>;

pub struct Schema {
    types: TypesMap,
    query_type_index: usize,
    mutation_type_index: Option<usize>,
    resolvers: ResolverMap,
}

impl Schema {
    pub fn type_named(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    /// All types in registration order, built-in scalars first.
    pub fn types(&self) -> impl Iterator<Item = &SchemaType> {
        self.types.values()
    }

    pub(crate) fn types_map(&self) -> &TypesMap {
        &self.types
    }

    /// The declared field `field_name` of an object or interface type.
    /// `__typename` is answered by the engine and is not a declared field.
    pub fn field_on(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        self.types.get(type_name)?.field(field_name)
    }

    /// The object types that can appear where `type_name` is expected: the
    /// implementors of an interface, the members of a union, or the object
    /// type itself.
    pub fn possible_types_of(&self, type_name: &str) -> &[String] {
        self.types
            .get(type_name)
            .map(SchemaType::possible_types)
            .unwrap_or_default()
    }

    /// True if `concrete` equals `condition`, or `condition` is an interface
    /// implemented by, or a union containing, `concrete`.
    pub fn is_subtype_compatible(&self, concrete: &str, condition: &str) -> bool {
        concrete == condition
            || self
                .possible_types_of(condition)
                .iter()
                .any(|possible| possible == concrete)
    }

    /// True if some object type is possible for both `a` and `b`.
    pub fn types_overlap(&self, a: &str, b: &str) -> bool {
        let b_possible = self.possible_types_of(b);
        self.possible_types_of(a)
            .iter()
            .any(|possible| b_possible.contains(possible))
    }

    pub fn query_type(&self) -> &SchemaType {
        &self.types[self.query_type_index]
    }

    pub fn mutation_type(&self) -> Option<&SchemaType> {
        self.mutation_type_index.map(|idx| &self.types[idx])
    }

    pub fn root_type(&self, kind: OperationKind) -> Option<&SchemaType> {
        match kind {
            OperationKind::Query => Some(self.query_type()),
            OperationKind::Mutation => self.mutation_type(),
        }
    }

    pub fn resolver_for(&self, type_name: &str, field_name: &str) -> Option<&Arc<dyn Resolver>> {
        self.resolvers.get(type_name)?.get(field_name)
    }

    pub(crate) fn is_composite(&self, type_name: &str) -> bool {
        self.types
            .get(type_name)
            .is_some_and(|schema_type| schema_type.kind() != TypeKind::Scalar)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound: Vec<String> = self
            .resolvers
            .iter()
            .flat_map(|(type_name, fields)| {
                fields.keys().map(move |field_name| format!("{type_name}.{field_name}"))
            })
            .collect();
        bound.sort();
        f.debug_struct("Schema")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field("query_type", &self.query_type().name())
            .field("mutation_type", &self.mutation_type().map(SchemaType::name))
            .field("resolvers", &bound)
            .finish()
    }
}

#[cfg(test)]
mod tests;
