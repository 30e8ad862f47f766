//! # Tuple Tree
//!
//! Schema-driven generator of C++ "tuple tree" data models.
//!
//! A tuple tree is a rooted graph of plain data classes described by a YAML
//! schema. The generator resolves the schema into an emission order, decides
//! which fields are embedded by value and which are held through owning
//! pointers, and emits C++ headers with accessors, comparisons, a kind-based
//! discriminator for each class hierarchy and optional dirty-bit tracking.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tupletree::prelude::*;
//!
//! let options = GeneratorOptions::builder()
//!     .namespace("model")
//!     .root_type("Binary")
//!     .tracking(true)
//!     .build()?;
//!
//! let sources = generate_from_str(&schema_text, &options)?;
//! for (path, contents) in sources.iter() {
//!     std::fs::write(path, contents)?;
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Document decoding, schema model, validation and resolution
//! - [`codegen`] - Generator options, C++ emitters and output assembly

pub mod prelude;

/// Schema model, validation and resolution.
pub mod schema {
    pub use tupletree_schema::*;
}

/// C++ code generation from schemas.
pub mod codegen {
    pub use tupletree_codegen::*;
}

// Re-export commonly used items at the crate root
pub use tupletree_codegen::{
    CodegenError, GeneratedSources, GeneratorOptions, generate_from_document, generate_from_file,
    generate_from_str,
};
pub use tupletree_schema::{DocumentError, SchemaError, SchemaIr};
