//! Raw schema document decoding.
//!
//! Turns bytes into the generic [`Value`] tree consumed by
//! [`crate::parser::parse_schema`]. YAML is the native format; since YAML is a
//! superset of JSON, JSON schemas decode as well.

use crate::error::DocumentError;
use serde_yaml::Value;
use std::path::Path;

/// Decodes a schema document from a string.
///
/// # Errors
/// Returns `DocumentError::Yaml` if the text is not well-formed YAML.
pub fn decode_document(source: &str) -> Result<Value, DocumentError> {
    Ok(serde_yaml::from_str(source)?)
}

/// Reads and decodes a schema document from a file.
///
/// # Errors
/// Returns `DocumentError` if the file cannot be read or decoded.
pub fn read_document(path: &Path) -> Result<Value, DocumentError> {
    let source = std::fs::read_to_string(path)?;
    decode_document(&source)
}
