//! Configuration file support.
//!
//! A configuration file supplies defaults for the generator options.
//! Command-line values win over file values; scalar types from both sources
//! are merged.

use crate::args::Cli;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use tupletree::{CodegenError, GeneratorOptions};

/// Generator options as read from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub namespace: Option<String>,
    pub root_type: Option<String>,
    pub scalar_types: Vec<String>,
    pub include_path_prefix: Option<String>,
    pub tracking: Option<bool>,
    pub tracking_debug: Option<bool>,
}

impl FileConfig {
    /// Parses a configuration document.
    ///
    /// # Errors
    /// Returns the YAML error if the document is malformed or has unknown
    /// keys.
    pub fn parse(source: &str) -> Result<Self, serde_yaml::Error> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::parse(&source)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }
}

/// Merges command-line arguments over file values into generator options.
///
/// # Errors
/// Returns `CodegenError::InvalidOptions` if the merged options are invalid.
pub fn resolve_options(cli: &Cli, file: FileConfig) -> Result<GeneratorOptions, CodegenError> {
    let mut builder = GeneratorOptions::builder()
        .scalar_types(file.scalar_types)
        .scalar_types(cli.scalar_types.iter().cloned())
        .tracking(cli.tracking || file.tracking.unwrap_or(false))
        .tracking_debug(cli.tracking_debug || file.tracking_debug.unwrap_or(false));

    if let Some(namespace) = cli.namespace.clone().or(file.namespace) {
        builder = builder.namespace(namespace);
    }
    if let Some(root_type) = cli.root_type.clone().or(file.root_type) {
        builder = builder.root_type(root_type);
    }
    if let Some(prefix) = cli.include_path_prefix.clone().or(file.include_path_prefix) {
        builder = builder.include_path_prefix(prefix);
    }

    builder.build()
}
