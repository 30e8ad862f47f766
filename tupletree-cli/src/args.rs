//! Command-line arguments.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Generate C++ tuple tree headers from a YAML schema.
#[derive(Debug, Parser)]
#[command(name = "tuple-tree-generate-cpp", version)]
pub struct Cli {
    /// Schema document (YAML or JSON)
    pub schema: PathBuf,

    /// Directory the generated headers are written to
    pub output_dir: PathBuf,

    /// C++ namespace of the generated types (`::` nesting allowed)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Root type of the tree
    #[arg(long)]
    pub root_type: Option<String>,

    /// Additional scalar type (repeatable)
    #[arg(long = "scalar-type", value_name = "TYPE")]
    pub scalar_types: Vec<String>,

    /// Prefix prepended to the generated include directives
    #[arg(long)]
    pub include_path_prefix: Option<String>,

    /// Emit dirty-bit tracking
    #[arg(long)]
    pub tracking: bool,

    /// Emit tracking diagnostics (requires --tracking)
    #[arg(long)]
    pub tracking_debug: bool,

    /// YAML file providing defaults for the options above
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Formatter executable
    #[arg(long, default_value = "clang-format", value_name = "PROGRAM")]
    pub formatter: String,

    /// Write the generated text without formatting it
    #[arg(long)]
    pub no_format: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter for the requested verbosity; `RUST_LOG` takes
    /// precedence.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "tuple-tree-generate-cpp",
            "model.yml",
            "out",
            "--namespace",
            "revng::model",
            "--root-type",
            "Binary",
            "--scalar-type",
            "MetaAddress",
            "--scalar-type",
            "Identifier",
            "--include-path-prefix",
            "revng/Model/",
            "--tracking",
            "--tracking-debug",
            "-vv",
        ])
        .expect("valid arguments");

        assert_eq!(cli.schema, PathBuf::from("model.yml"));
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert_eq!(cli.namespace.as_deref(), Some("revng::model"));
        assert_eq!(cli.scalar_types, vec!["MetaAddress", "Identifier"]);
        assert!(cli.tracking);
        assert!(cli.tracking_debug);
        assert_eq!(cli.formatter, "clang-format");
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_missing_output_dir() {
        let result = Cli::try_parse_from(["tuple-tree-generate-cpp", "model.yml"]);
        assert!(result.is_err());
    }
}
