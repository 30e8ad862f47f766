//! Generator options.

use crate::error::CodegenError;
use tupletree_schema::ScalarRegistry;
use tupletree_schema::parser::is_identifier;

/// Options controlling one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Namespace of the emitted types (`::`-separated).
    pub namespace: String,
    /// Tree root type.
    pub root_type: String,
    /// Scalar types added to the built-in registry.
    pub scalar_types: Vec<String>,
    /// Prefix prepended to emitted include directives.
    pub include_path_prefix: String,
    /// Emit dirty-bit instrumentation.
    pub tracking: bool,
    /// Emit human-readable dirty-state diagnostics.
    pub tracking_debug: bool,
}

impl GeneratorOptions {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder::new()
    }

    /// Returns the scalar registry these options describe.
    #[must_use]
    pub fn scalar_registry(&self) -> ScalarRegistry {
        ScalarRegistry::new().with_scalars(self.scalar_types.iter().cloned())
    }

    /// Returns the namespace segments.
    pub fn namespace_segments(&self) -> impl Iterator<Item = &str> {
        self.namespace.split("::")
    }
}

/// Builder for [`GeneratorOptions`].
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptionsBuilder {
    namespace: Option<String>,
    root_type: Option<String>,
    scalar_types: Vec<String>,
    include_path_prefix: String,
    tracking: bool,
    tracking_debug: bool,
}

impl GeneratorOptionsBuilder {
    /// Creates a new builder with tracking disabled and an empty include
    /// path prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the root type.
    #[must_use]
    pub fn root_type(mut self, root_type: impl Into<String>) -> Self {
        self.root_type = Some(root_type.into());
        self
    }

    /// Adds a scalar type.
    #[must_use]
    pub fn scalar_type(mut self, name: impl Into<String>) -> Self {
        self.scalar_types.push(name.into());
        self
    }

    /// Adds several scalar types.
    #[must_use]
    pub fn scalar_types<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scalar_types.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the include path prefix.
    #[must_use]
    pub fn include_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.include_path_prefix = prefix.into();
        self
    }

    /// Enables or disables tracking.
    #[must_use]
    pub fn tracking(mut self, enabled: bool) -> Self {
        self.tracking = enabled;
        self
    }

    /// Enables or disables tracking diagnostics.
    #[must_use]
    pub fn tracking_debug(mut self, enabled: bool) -> Self {
        self.tracking_debug = enabled;
        self
    }

    /// Validates and builds the options.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidOptions` if the namespace or root type
    /// is missing or malformed, or if tracking diagnostics are requested
    /// without tracking.
    pub fn build(self) -> Result<GeneratorOptions, CodegenError> {
        let namespace = self
            .namespace
            .ok_or_else(|| CodegenError::invalid_options("missing namespace"))?;
        if namespace.split("::").any(|segment| !is_identifier(segment)) {
            return Err(CodegenError::invalid_options(format!(
                "'{namespace}' is not a valid namespace"
            )));
        }

        let root_type = self
            .root_type
            .ok_or_else(|| CodegenError::invalid_options("missing root type"))?;
        if !is_identifier(&root_type) {
            return Err(CodegenError::invalid_options(format!(
                "'{root_type}' is not a valid root type name"
            )));
        }

        if self.tracking_debug && !self.tracking {
            return Err(CodegenError::invalid_options(
                "tracking debug requires tracking",
            ));
        }

        let mut scalar_types: Vec<String> = Vec::with_capacity(self.scalar_types.len());
        for name in self.scalar_types {
            if !scalar_types.contains(&name) {
                scalar_types.push(name);
            }
        }

        Ok(GeneratorOptions {
            namespace,
            root_type,
            scalar_types,
            include_path_prefix: self.include_path_prefix,
            tracking: self.tracking,
            tracking_debug: self.tracking_debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let options = GeneratorOptions::builder()
            .namespace("model")
            .root_type("Binary")
            .build()
            .expect("valid options");
        assert!(!options.tracking);
        assert!(!options.tracking_debug);
        assert!(options.include_path_prefix.is_empty());
        assert!(options.scalar_registry().is_scalar("uint64_t"));
    }

    #[test]
    fn test_builder_scalars_deduplicated() {
        let options = GeneratorOptions::builder()
            .namespace("model")
            .root_type("Binary")
            .scalar_type("MetaAddress")
            .scalar_types(["MetaAddress", "Identifier"])
            .build()
            .expect("valid options");
        assert_eq!(options.scalar_types, vec!["MetaAddress", "Identifier"]);
        assert!(options.scalar_registry().is_scalar("Identifier"));
    }

    #[test]
    fn test_nested_namespace() {
        let options = GeneratorOptions::builder()
            .namespace("revng::model")
            .root_type("Binary")
            .build()
            .expect("valid options");
        let segments: Vec<_> = options.namespace_segments().collect();
        assert_eq!(segments, vec!["revng", "model"]);
    }

    #[test]
    fn test_invalid_namespace() {
        let result = GeneratorOptions::builder()
            .namespace("revng::")
            .root_type("Binary")
            .build();
        assert!(matches!(result, Err(CodegenError::InvalidOptions { .. })));
    }

    #[test]
    fn test_missing_root() {
        let result = GeneratorOptions::builder().namespace("model").build();
        assert!(matches!(result, Err(CodegenError::InvalidOptions { .. })));
    }

    #[test]
    fn test_tracking_debug_requires_tracking() {
        let result = GeneratorOptions::builder()
            .namespace("model")
            .root_type("Binary")
            .tracking_debug(true)
            .build();
        assert!(matches!(result, Err(CodegenError::InvalidOptions { .. })));

        let options = GeneratorOptions::builder()
            .namespace("model")
            .root_type("Binary")
            .tracking(true)
            .tracking_debug(true)
            .build()
            .expect("valid options");
        assert!(options.tracking_debug);
    }
}
