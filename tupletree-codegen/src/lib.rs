//! # Tuple Tree Codegen
//!
//! C++ source generation from tuple tree schemas.
//!
//! This crate provides:
//! - Generator options with validation
//! - Forward declaration, enum and class emission
//! - Optional dirty-bit tracking instrumentation
//! - Assembly of the emitted units into ordered output files

pub mod cpp;
pub mod error;
pub mod generator;
pub mod options;

pub use error::{CodegenError, EmissionError};
pub use generator::{GeneratedSources, Generator};
pub use options::{GeneratorOptions, GeneratorOptionsBuilder};

use tupletree_schema::{SchemaIr, decode_document, parse_schema, read_document};

/// Generates C++ sources from a decoded schema document.
///
/// # Errors
/// Returns `CodegenError` if the schema is invalid or emission fails.
pub fn generate_from_document(
    document: &serde_yaml::Value,
    options: &GeneratorOptions,
) -> Result<GeneratedSources, CodegenError> {
    let schema = parse_schema(
        document,
        &options.namespace,
        &options.root_type,
        options.scalar_registry(),
    )?;
    let ir = SchemaIr::from_schema(&schema)?;

    let unreachable = ir.unreachable_types();
    if !unreachable.is_empty() {
        tracing::warn!(types = ?unreachable, "types not reachable from the root type");
    }

    Generator::new(&ir, options).generate()
}

/// Generates C++ sources from schema document text.
///
/// # Arguments
/// * `source` - Schema document content
/// * `options` - Generator options
///
/// # Errors
/// Returns `CodegenError` if decoding, resolution or emission fails.
pub fn generate_from_str(
    source: &str,
    options: &GeneratorOptions,
) -> Result<GeneratedSources, CodegenError> {
    let document = decode_document(source)?;
    generate_from_document(&document, options)
}

/// Generates C++ sources from a schema document file.
///
/// # Errors
/// Returns `CodegenError` if reading, decoding, resolution or emission fails.
pub fn generate_from_file(
    path: &std::path::Path,
    options: &GeneratorOptions,
) -> Result<GeneratedSources, CodegenError> {
    let document = read_document(path)?;
    generate_from_document(&document, options)
}
