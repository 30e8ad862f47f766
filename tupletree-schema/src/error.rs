//! Error types for document decoding and schema construction.

use thiserror::Error;

/// Error type for decoding the raw schema document.
///
/// These are surfaced to the caller unmodified; the schema layer never
/// reinterprets them.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// YAML (or JSON) decoding error.
    #[error("document decoding error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error while reading the document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for schema construction, resolution and validation.
///
/// Any of these aborts the whole generation run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The document does not have the expected shape.
    #[error("invalid schema document at {context}: {message}")]
    InvalidDocument {
        /// Location inside the document (entry, key).
        context: String,
        /// Error message.
        message: String,
    },

    /// Two definitions share a name.
    #[error("duplicate type '{name}'")]
    DuplicateType {
        /// Name of the duplicate.
        name: String,
    },

    /// A field name is declared twice in a type or its bases.
    #[error("duplicate field '{field}' in type '{type_name}' (also declared in '{first_owner}')")]
    DuplicateField {
        /// Type declaring the second occurrence.
        type_name: String,
        /// Field name.
        field: String,
        /// Type holding the first occurrence.
        first_owner: String,
    },

    /// An enum member is declared twice.
    #[error("duplicate member '{member}' in enum '{enum_name}'")]
    DuplicateMember {
        /// Enum name.
        enum_name: String,
        /// Member name.
        member: String,
    },

    /// A reference names neither a scalar nor a declared type.
    #[error("unknown type '{type_name}' referenced by {referrer}")]
    UnknownType {
        /// Type name.
        type_name: String,
        /// Human-readable description of the referencing site.
        referrer: String,
    },

    /// A reference names a type of the wrong category.
    #[error("invalid reference to '{type_name}' from {referrer}: {reason}")]
    InvalidReference {
        /// Type name.
        type_name: String,
        /// Human-readable description of the referencing site.
        referrer: String,
        /// Why the reference is rejected.
        reason: String,
    },

    /// The base chain of a type revisits itself.
    #[error("cyclic inheritance: {cycle}")]
    CyclicInheritance {
        /// The cycle, rendered as `A -> B -> A`.
        cycle: String,
    },

    /// The declared root type is not a declared type.
    #[error("missing root type '{name}'")]
    MissingRoot {
        /// Root type name.
        name: String,
    },

    /// The declared root type exists but cannot be a tree root.
    #[error("invalid root type '{name}': {reason}")]
    InvalidRoot {
        /// Root type name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl SchemaError {
    /// Creates an invalid document error.
    pub fn invalid_document(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Creates a duplicate type error.
    pub fn duplicate_type(name: impl Into<String>) -> Self {
        Self::DuplicateType { name: name.into() }
    }

    /// Creates an unknown type error.
    pub fn unknown_type(type_name: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
            referrer: referrer.into(),
        }
    }

    /// Creates an invalid reference error.
    pub fn invalid_reference(
        type_name: impl Into<String>,
        referrer: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidReference {
            type_name: type_name.into(),
            referrer: referrer.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid root error.
    pub fn invalid_root(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRoot {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
