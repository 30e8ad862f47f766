//! Schema validation utilities.
//!
//! This module checks a parsed schema for correctness and consistency before
//! it is resolved: every reference must name a scalar or a declared type, the
//! root must be usable as a tree root, base chains must be acyclic and field
//! names must be unique across a type and its bases.

use crate::error::SchemaError;
use crate::order::{check_inheritance, inheritance_chain};
use crate::types::{CompositeDef, Schema, TypeDef};
use std::collections::{HashMap, HashSet};

/// Name the emitter reserves for the implicit first member of every enum.
pub const RESERVED_ENUM_MEMBER: &str = "Invalid";

/// Validates a parsed schema.
///
/// # Errors
/// Returns the first `SchemaError` found.
pub fn validate_schema(schema: &Schema) -> Result<(), SchemaError> {
    validate_references(schema)?;
    validate_root(schema)?;
    check_inheritance(schema)?;
    validate_fields(schema)?;
    validate_enums(schema)?;
    Ok(())
}

/// Validates that every base and field reference resolves.
fn validate_references(schema: &Schema) -> Result<(), SchemaError> {
    for composite in schema.composites() {
        if let Some(base) = &composite.base {
            let referrer = format!("base of '{}'", composite.name);
            match schema.get_type(base) {
                Some(TypeDef::Composite(_)) => {}
                Some(TypeDef::Enum(_)) => {
                    return Err(SchemaError::invalid_reference(
                        base,
                        referrer,
                        "an enum cannot be inherited from",
                    ));
                }
                None if schema.scalars.is_scalar(base) => {
                    return Err(SchemaError::invalid_reference(
                        base,
                        referrer,
                        "a scalar cannot be inherited from",
                    ));
                }
                None => return Err(SchemaError::unknown_type(base, referrer)),
            }
        }

        for field in &composite.fields {
            let type_name = field.type_ref.type_name();
            if !schema.has_type(type_name) && !schema.scalars.is_scalar(type_name) {
                return Err(SchemaError::unknown_type(
                    type_name,
                    format!("field '{}.{}'", composite.name, field.name),
                ));
            }
        }
    }
    Ok(())
}

/// Validates the declared root type.
fn validate_root(schema: &Schema) -> Result<(), SchemaError> {
    let root = &schema.root_type;
    match schema.get_type(root) {
        None => Err(SchemaError::MissingRoot { name: root.clone() }),
        Some(TypeDef::Enum(_)) => Err(SchemaError::invalid_root(root, "root type is an enum")),
        Some(TypeDef::Composite(c)) if c.base.is_some() => Err(SchemaError::invalid_root(
            root,
            "root type cannot inherit from another type",
        )),
        Some(TypeDef::Composite(c)) if c.is_abstract => {
            Err(SchemaError::invalid_root(root, "root type cannot be abstract"))
        }
        Some(TypeDef::Composite(_)) => Ok(()),
    }
}

/// Validates field name uniqueness, inherited fields included.
fn validate_fields(schema: &Schema) -> Result<(), SchemaError> {
    for composite in schema.composites() {
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for ancestor in inheritance_chain(schema, &composite.name) {
            check_own_fields(ancestor, &mut owners)?;
        }
    }
    Ok(())
}

fn check_own_fields<'a>(
    composite: &'a CompositeDef,
    owners: &mut HashMap<&'a str, &'a str>,
) -> Result<(), SchemaError> {
    for field in &composite.fields {
        if let Some(first_owner) = owners.insert(&field.name, &composite.name) {
            return Err(SchemaError::DuplicateField {
                type_name: composite.name.clone(),
                field: field.name.clone(),
                first_owner: first_owner.to_string(),
            });
        }
    }
    Ok(())
}

/// Validates enum member uniqueness.
fn validate_enums(schema: &Schema) -> Result<(), SchemaError> {
    for enum_def in schema.enums() {
        let mut seen = HashSet::new();
        seen.insert(RESERVED_ENUM_MEMBER);
        for member in &enum_def.members {
            if !seen.insert(member.name.as_str()) {
                return Err(SchemaError::DuplicateMember {
                    enum_name: enum_def.name.clone(),
                    member: member.name.clone(),
                });
            }
        }
    }
    Ok(())
}
