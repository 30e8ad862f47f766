//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema document decoding error.
    #[error("document error: {0}")]
    Document(#[from] tupletree_schema::DocumentError),

    /// Schema construction or resolution error.
    #[error("schema error: {0}")]
    Schema(#[from] tupletree_schema::SchemaError),

    /// Emitter invariant violation.
    #[error("emission error: {0}")]
    Emission(#[from] EmissionError),

    /// Invalid generator options.
    #[error("invalid options: {message}")]
    InvalidOptions {
        /// Error message.
        message: String,
    },

    /// A field name collides with a member every generated class declares.
    #[error("field '{field}' of type '{type_name}' collides with a generated member")]
    ReservedName {
        /// Owning type.
        type_name: String,
        /// Field name.
        field: String,
    },

    /// Two fields visible in one class generate the same identifier.
    #[error("fields '{field}' and '{other}' of type '{type_name}' both generate '{spelling}'")]
    NameCollision {
        /// Class in which the collision occurs.
        type_name: String,
        /// Field generating the identifier second.
        field: String,
        /// Field generating it first.
        other: String,
        /// The shared identifier.
        spelling: String,
    },
}

impl CodegenError {
    /// Creates an invalid options error with the given message.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }
}

/// Emitter-internal invariant violations.
///
/// These indicate a resolver bug and are never expected for a schema that
/// went through [`tupletree_schema::SchemaIr::from_schema`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmissionError {
    /// A type name reached the emitter without a resolved definition.
    #[error("unresolved type '{type_name}' reached the emitter from {referrer}")]
    UnresolvedType {
        /// Type name.
        type_name: String,
        /// Where it was referenced.
        referrer: String,
    },

    /// The emission units do not form a DAG.
    #[error("emission units depend on each other cyclically: {cycle}")]
    CyclicUnits {
        /// The cycle, rendered as `A -> B -> A`.
        cycle: String,
    },
}

impl EmissionError {
    /// Creates an unresolved type error.
    pub fn unresolved(type_name: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self::UnresolvedType {
            type_name: type_name.into(),
            referrer: referrer.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_conversion() {
        let err: CodegenError = tupletree_schema::SchemaError::MissingRoot {
            name: "Binary".to_string(),
        }
        .into();
        assert!(matches!(err, CodegenError::Schema(_)));
        assert!(err.to_string().contains("Binary"));
    }

    #[test]
    fn test_emission_error_display() {
        let err = EmissionError::unresolved("Ghost", "base of 'Derived'");
        assert_eq!(
            err.to_string(),
            "unresolved type 'Ghost' reached the emitter from base of 'Derived'"
        );
    }
}
