mod schema_type;
mod type_ref;

pub use schema_type::ArgumentDefinition;
pub use schema_type::FieldDefinition;
pub use schema_type::SchemaType;
pub use schema_type::TypeKind;
pub use type_ref::TypeRef;

use indexmap::IndexMap;

/// All named types of a schema, in registration order.
pub type TypesMap = IndexMap<String, SchemaType>;
