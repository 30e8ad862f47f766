//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tupletree::prelude::*;
//! ```

// Schema types
pub use tupletree_schema::{
    CompositeDef, DocumentError, EnumDef, FieldDef, FieldKind, ResolvedType, ScalarRegistry,
    Schema, SchemaError, SchemaIr, TypeDef, TypeRef, decode_document, parse_schema,
};

// Generation
pub use tupletree_codegen::{
    CodegenError, EmissionError, GeneratedSources, Generator, GeneratorOptions,
    GeneratorOptionsBuilder, generate_from_document, generate_from_file, generate_from_str,
};
