//! Schema document parser.
//!
//! This is the single place where the dynamically shaped document becomes the
//! typed model of [`crate::types`]. Every shape violation is reported here as
//! `SchemaError::InvalidDocument`; references are not resolved yet, so a type
//! may freely mention types declared later in the document.

use crate::error::SchemaError;
use crate::types::{
    CompositeDef, EnumDef, EnumMember, FieldDef, ScalarRegistry, Schema, TypeDef, TypeRef,
};
use serde_yaml::{Mapping, Value};

const STRUCT_KEYS: &[&str] = &["name", "type", "doc", "inherits", "abstract", "fields"];
const ENUM_KEYS: &[&str] = &["name", "type", "doc", "members"];
const FIELD_KEYS: &[&str] = &["name", "type", "doc", "optional", "sequence"];
const SEQUENCE_KEYS: &[&str] = &["elementType"];
const MEMBER_KEYS: &[&str] = &["name", "doc"];

/// Parses a decoded schema document.
///
/// # Arguments
/// * `document` - Decoded document tree
/// * `namespace` - Namespace the generated types live in
/// * `root_type` - Name of the tree root type
/// * `scalars` - Scalar registry
///
/// # Errors
/// Returns `SchemaError::InvalidDocument` for malformed shapes and
/// `SchemaError::DuplicateType` for repeated names.
pub fn parse_schema(
    document: &Value,
    namespace: &str,
    root_type: &str,
    scalars: ScalarRegistry,
) -> Result<Schema, SchemaError> {
    let mut schema = Schema::new(namespace, root_type, scalars);

    for (index, entry) in definitions(document)?.iter().enumerate() {
        let type_def = parse_definition(entry, index)?;
        schema.add_type(type_def)?;
    }

    tracing::debug!(
        types = schema.types().count(),
        namespace,
        "parsed schema document"
    );

    Ok(schema)
}

/// Extracts the list of definitions.
///
/// Accepts either a top-level sequence or a mapping with a `definitions` key.
fn definitions(document: &Value) -> Result<&[Value], SchemaError> {
    match document {
        Value::Sequence(entries) => Ok(entries),
        Value::Mapping(map) => {
            check_keys(map, &["definitions"], "document root")?;
            match map.get("definitions") {
                Some(Value::Sequence(entries)) => Ok(entries),
                Some(_) => Err(SchemaError::invalid_document(
                    "document root",
                    "'definitions' must be a sequence",
                )),
                None => Err(SchemaError::invalid_document(
                    "document root",
                    "missing 'definitions'",
                )),
            }
        }
        Value::Null => Ok(&[]),
        _ => Err(SchemaError::invalid_document(
            "document root",
            "expected a sequence of definitions",
        )),
    }
}

/// Parses one definition entry.
fn parse_definition(entry: &Value, index: usize) -> Result<TypeDef, SchemaError> {
    let fallback = format!("definitions[{index}]");
    let map = as_mapping(entry, &fallback)?;
    let name = require_identifier(map, "name", &fallback)?;
    let context = format!("definition '{name}'");

    match require_str(map, "type", &context)? {
        "struct" => {
            check_keys(map, STRUCT_KEYS, &context)?;
            parse_composite(map, name, &context).map(TypeDef::Composite)
        }
        "enum" => {
            check_keys(map, ENUM_KEYS, &context)?;
            parse_enum(map, name, &context).map(TypeDef::Enum)
        }
        other => Err(SchemaError::invalid_document(
            context,
            format!("unknown definition type '{other}' (expected 'struct' or 'enum')"),
        )),
    }
}

/// Parses a composite definition.
fn parse_composite(map: &Mapping, name: &str, context: &str) -> Result<CompositeDef, SchemaError> {
    let mut composite = CompositeDef::new(name);
    composite.doc = optional_str(map, "doc", context)?.map(str::to_string);
    composite.base = optional_str(map, "inherits", context)?.map(str::to_string);
    composite.is_abstract = optional_bool(map, "abstract", context)?.unwrap_or(false);

    match map.get("fields") {
        None | Some(Value::Null) => {}
        Some(Value::Sequence(fields)) => {
            for field in fields {
                composite.fields.push(parse_field(field, context)?);
            }
        }
        Some(_) => {
            return Err(SchemaError::invalid_document(
                context,
                "'fields' must be a sequence",
            ));
        }
    }

    Ok(composite)
}

/// Parses a field entry.
fn parse_field(entry: &Value, owner_context: &str) -> Result<FieldDef, SchemaError> {
    let map = as_mapping(entry, owner_context)?;
    let name = require_identifier(map, "name", owner_context)?;
    let context = format!("{owner_context}, field '{name}'");
    check_keys(map, FIELD_KEYS, &context)?;

    let named = optional_str(map, "type", &context)?;
    let mut type_ref = match (named, map.get("sequence")) {
        (Some(type_name), None) => TypeRef::named(type_name),
        (None, Some(sequence)) => {
            let sequence_context = format!("{context}, sequence");
            let sequence = as_mapping(sequence, &sequence_context)?;
            check_keys(sequence, SEQUENCE_KEYS, &sequence_context)?;
            let element = require_str(sequence, "elementType", &sequence_context)?;
            TypeRef::sequence(TypeRef::named(element))
        }
        (Some(_), Some(_)) => {
            return Err(SchemaError::invalid_document(
                context,
                "'type' and 'sequence' are mutually exclusive",
            ));
        }
        (None, None) => {
            return Err(SchemaError::invalid_document(
                context,
                "missing 'type' or 'sequence'",
            ));
        }
    };

    if optional_bool(map, "optional", &context)?.unwrap_or(false) {
        type_ref = TypeRef::optional(type_ref);
    }

    let mut field = FieldDef::new(name, type_ref);
    field.doc = optional_str(map, "doc", &context)?.map(str::to_string);
    Ok(field)
}

/// Parses an enum definition.
fn parse_enum(map: &Mapping, name: &str, context: &str) -> Result<EnumDef, SchemaError> {
    let members = match map.get("members") {
        Some(Value::Sequence(members)) if !members.is_empty() => members,
        Some(Value::Sequence(_)) => {
            return Err(SchemaError::invalid_document(
                context,
                "'members' must not be empty",
            ));
        }
        Some(_) => {
            return Err(SchemaError::invalid_document(
                context,
                "'members' must be a sequence",
            ));
        }
        None => return Err(SchemaError::invalid_document(context, "missing 'members'")),
    };

    let mut parsed = Vec::with_capacity(members.len());
    for member in members {
        let member_map = as_mapping(member, context)?;
        check_keys(member_map, MEMBER_KEYS, context)?;
        let member_name = require_identifier(member_map, "name", context)?;
        parsed.push(EnumMember {
            name: member_name.to_string(),
            doc: optional_str(member_map, "doc", context)?.map(str::to_string),
        });
    }

    Ok(EnumDef {
        name: name.to_string(),
        doc: optional_str(map, "doc", context)?.map(str::to_string),
        members: parsed,
    })
}

fn as_mapping<'a>(value: &'a Value, context: &str) -> Result<&'a Mapping, SchemaError> {
    value
        .as_mapping()
        .ok_or_else(|| SchemaError::invalid_document(context, "expected a mapping"))
}

/// Rejects keys outside of `allowed`.
fn check_keys(map: &Mapping, allowed: &[&str], context: &str) -> Result<(), SchemaError> {
    for key in map.keys() {
        match key.as_str() {
            Some(key) if allowed.contains(&key) => {}
            Some(key) => {
                return Err(SchemaError::invalid_document(
                    context,
                    format!("unexpected key '{key}'"),
                ));
            }
            None => {
                return Err(SchemaError::invalid_document(
                    context,
                    "keys must be strings",
                ));
            }
        }
    }
    Ok(())
}

fn optional_str<'a>(
    map: &'a Mapping,
    key: &str,
    context: &str,
) -> Result<Option<&'a str>, SchemaError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(SchemaError::invalid_document(
            context,
            format!("'{key}' must be a string"),
        )),
    }
}

fn require_str<'a>(map: &'a Mapping, key: &str, context: &str) -> Result<&'a str, SchemaError> {
    optional_str(map, key, context)?
        .ok_or_else(|| SchemaError::invalid_document(context, format!("missing '{key}'")))
}

fn require_identifier<'a>(
    map: &'a Mapping,
    key: &str,
    context: &str,
) -> Result<&'a str, SchemaError> {
    let value = require_str(map, key, context)?;
    if is_identifier(value) {
        Ok(value)
    } else {
        Err(SchemaError::invalid_document(
            context,
            format!("'{value}' is not a valid identifier"),
        ))
    }
}

fn optional_bool(map: &Mapping, key: &str, context: &str) -> Result<Option<bool>, SchemaError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(SchemaError::invalid_document(
            context,
            format!("'{key}' must be a boolean"),
        )),
    }
}

/// Returns true if `s` is a plain C-style identifier.
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
