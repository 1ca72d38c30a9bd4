use crate::coercion::coerce_input_value;
use crate::schema::SchemaBuildError;
use crate::types::FieldDefinition;
use crate::types::SchemaType;
use crate::types::TypeKind;
use crate::types::TypeRef;
use crate::types::TypesMap;
use std::collections::HashSet;

/// Checks one registered type against the rest of the types map.
pub(super) struct SchemaTypeValidator<'a> {
    errors: Vec<SchemaBuildError>,
    type_: &'a SchemaType,
    types_map: &'a TypesMap,
}

impl<'a> SchemaTypeValidator<'a> {
    pub fn new(type_: &'a SchemaType, types_map: &'a TypesMap) -> Self {
        Self {
            errors: vec![],
            type_,
            types_map,
        }
    }

    pub fn validate(mut self) -> Vec<SchemaBuildError> {
        match self.type_.kind {
            TypeKind::Object | TypeKind::Interface => {
                if self.type_.fields.is_empty() {
                    self.errors.push(SchemaBuildError::EmptyFieldsDefinition {
                        type_name: self.type_.name.clone(),
                    });
                }
                for field in self.type_.fields.values() {
                    self.validate_field(field);
                }
                self.validate_interface_implementations();
            },
            TypeKind::Union => self.validate_union_members(),
            TypeKind::Scalar => (),
        }
        self.errors
    }

    fn validate_field(&mut self, field: &FieldDefinition) {
        let type_name = &self.type_.name;
        if field.name.starts_with("__") {
            self.errors.push(SchemaBuildError::ReservedName {
                name: format!("{type_name}.{}", field.name),
            });
        }

        let result_type_name = field.field_type.named_type();
        if !self.types_map.contains_key(result_type_name) {
            self.errors.push(SchemaBuildError::UndefinedTypeName {
                referencing_type: type_name.clone(),
                referencing_field: field.name.clone(),
                undefined_type_name: result_type_name.to_string(),
            });
        }

        for arg in field.arguments.values() {
            let arg_type_name = arg.value_type.named_type();
            let Some(arg_type) = self.types_map.get(arg_type_name) else {
                self.errors.push(SchemaBuildError::UndefinedTypeName {
                    referencing_type: type_name.clone(),
                    referencing_field: format!("{}({}:)", field.name, arg.name),
                    undefined_type_name: arg_type_name.to_string(),
                });
                continue;
            };
            if !arg_type.is_input_type() {
                self.errors.push(SchemaBuildError::InvalidArgumentType {
                    type_name: type_name.clone(),
                    field_name: field.name.clone(),
                    argument_name: arg.name.clone(),
                    argument_type: arg.value_type.to_string(),
                });
                continue;
            }
            if let Some(default_value) = &arg.default_value
                && let Err(reason) = coerce_input_value(default_value, &arg.value_type, self.types_map)
            {
                self.errors.push(SchemaBuildError::InvalidDefaultValue {
                    type_name: type_name.clone(),
                    field_name: field.name.clone(),
                    argument_name: arg.name.clone(),
                    reason,
                });
            }
        }
    }

    // https://spec.graphql.org/October2021/#IsValidImplementation()
    fn validate_interface_implementations(&mut self) {
        let type_name = &self.type_.name;
        let implemented: HashSet<&str> =
            self.type_.interfaces.iter().map(String::as_str).collect();

        for iface_name in &self.type_.interfaces {
            let Some(iface_type) = self.types_map.get(iface_name) else {
                self.errors.push(SchemaBuildError::ImplementsUndefinedInterface {
                    type_name: type_name.clone(),
                    interface_name: iface_name.clone(),
                });
                continue;
            };
            if iface_type.kind != TypeKind::Interface {
                self.errors.push(SchemaBuildError::ImplementsNonInterfaceType {
                    type_name: type_name.clone(),
                    non_interface_type_name: iface_name.clone(),
                });
                continue;
            }

            // Interfaces implemented by this interface must be declared
            // explicitly by the implementing type as well.
            for transitive_name in &iface_type.interfaces {
                if !implemented.contains(transitive_name.as_str()) {
                    self.errors.push(SchemaBuildError::MissingRecursiveInterfaceImplementation {
                        type_name: type_name.clone(),
                        interface_name: iface_name.clone(),
                        missing_interface_name: transitive_name.clone(),
                    });
                }
            }

            for (field_name, iface_field) in &iface_type.fields {
                let Some(type_field) = self.type_.fields.get(field_name) else {
                    self.errors.push(SchemaBuildError::MissingInterfaceSpecifiedField {
                        type_name: type_name.clone(),
                        interface_name: iface_name.clone(),
                        field_name: field_name.clone(),
                    });
                    continue;
                };
                self.validate_implemented_field(iface_name, iface_field, type_field);
            }
        }
    }

    fn validate_implemented_field(
        &mut self,
        iface_name: &str,
        iface_field: &FieldDefinition,
        type_field: &FieldDefinition,
    ) {
        let type_name = &self.type_.name;
        if !is_covariant(self.types_map, &type_field.field_type, &iface_field.field_type) {
            self.errors.push(SchemaBuildError::InvalidInterfaceSpecifiedFieldType {
                type_name: type_name.clone(),
                interface_name: iface_name.to_string(),
                field_name: type_field.name.clone(),
                expected_type: iface_field.field_type.to_string(),
                actual_type: type_field.field_type.to_string(),
            });
        }

        for (arg_name, iface_arg) in &iface_field.arguments {
            match type_field.arguments.get(arg_name) {
                None => self.errors.push(SchemaBuildError::MissingInterfaceSpecifiedFieldArgument {
                    type_name: type_name.clone(),
                    interface_name: iface_name.to_string(),
                    field_name: type_field.name.clone(),
                    argument_name: arg_name.clone(),
                }),
                Some(type_arg) if type_arg.value_type != iface_arg.value_type => {
                    self.errors.push(
                        SchemaBuildError::InvalidInterfaceSpecifiedFieldArgumentType {
                            type_name: type_name.clone(),
                            interface_name: iface_name.to_string(),
                            field_name: type_field.name.clone(),
                            argument_name: arg_name.clone(),
                            expected_type: iface_arg.value_type.to_string(),
                            actual_type: type_arg.value_type.to_string(),
                        },
                    )
                },
                Some(_) => (),
            }
        }

        for (arg_name, type_arg) in &type_field.arguments {
            if !iface_field.arguments.contains_key(arg_name) && type_arg.is_required() {
                self.errors.push(SchemaBuildError::InvalidAdditionalFieldArgument {
                    type_name: type_name.clone(),
                    interface_name: iface_name.to_string(),
                    field_name: type_field.name.clone(),
                    argument_name: arg_name.clone(),
                });
            }
        }
    }

    fn validate_union_members(&mut self) {
        let union_name = &self.type_.name;
        if self.type_.possible_types.is_empty() {
            self.errors.push(SchemaBuildError::EmptyUnion {
                union_name: union_name.clone(),
            });
        }
        // Member types of a union type can only be object types.
        // https://spec.graphql.org/October2021/#sel-HAHdfFDABABlG3ib
        for member_name in &self.type_.possible_types {
            match self.types_map.get(member_name) {
                None => self.errors.push(SchemaBuildError::UndefinedUnionMember {
                    union_name: union_name.clone(),
                    member_name: member_name.clone(),
                }),
                Some(member) if member.kind != TypeKind::Object => {
                    self.errors.push(SchemaBuildError::InvalidUnionMemberTypeKind {
                        union_name: union_name.clone(),
                        member_name: member_name.clone(),
                        kind: member.kind,
                    })
                },
                Some(_) => (),
            }
        }
    }
}

/// Whether a field of type `sub` may stand in for a field of type `sup`.
///
/// https://spec.graphql.org/October2021/#IsValidImplementationFieldType()
pub(super) fn is_covariant(types_map: &TypesMap, sub: &TypeRef, sup: &TypeRef) -> bool {
    match (sub, sup) {
        (TypeRef::NonNull(sub_inner), TypeRef::NonNull(sup_inner)) => {
            is_covariant(types_map, sub_inner, sup_inner)
        },
        (_, TypeRef::NonNull(_)) => false,
        (TypeRef::NonNull(sub_inner), _) => is_covariant(types_map, sub_inner, sup),
        (TypeRef::List(sub_inner), TypeRef::List(sup_inner)) => {
            is_covariant(types_map, sub_inner, sup_inner)
        },
        (TypeRef::Named(sub_name), TypeRef::Named(sup_name)) => {
            if sub_name == sup_name {
                return true;
            }
            let (Some(sub_type), Some(sup_type)) =
                (types_map.get(sub_name), types_map.get(sup_name))
            else {
                return false;
            };
            match sup_type.kind {
                TypeKind::Union => sup_type.possible_types.contains(sub_name),
                TypeKind::Interface => sub_type.interfaces.contains(sup_name),
                TypeKind::Object | TypeKind::Scalar => false,
            }
        },
        _ => false,
    }
}
