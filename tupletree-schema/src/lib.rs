//! # Tuple Tree Schema
//!
//! Schema model and type resolver for the tuple tree generator.
//!
//! This crate provides:
//! - Decoding of the raw schema document
//! - The scalar registry and the typed schema model
//! - Schema validation (references, root, inheritance, field names)
//! - Emission ordering and resolution into an intermediate representation

pub mod document;
pub mod error;
pub mod ir;
pub mod order;
pub mod parser;
pub mod types;
pub mod validation;

pub use document::{decode_document, read_document};
pub use error::{DocumentError, SchemaError};
pub use ir::{FieldKind, Hierarchy, ResolvedField, ResolvedType, SchemaIr};
pub use parser::parse_schema;
pub use types::{
    CompositeDef, EnumDef, EnumMember, FieldDef, ScalarRegistry, Schema, TypeDef, TypeRef,
};
pub use validation::validate_schema;
