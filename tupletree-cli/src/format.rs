//! Formatting of generated sources.

use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;
use tupletree::GeneratedSources;

/// Formatter errors.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The formatter executable could not be found.
    #[error("formatter '{program}' is not available")]
    FormatterUnavailable {
        /// Executable name.
        program: String,
    },

    /// The formatter ran and reported a failure.
    #[error("formatter '{program}' failed on {path}: {stderr}")]
    Failed {
        /// Executable name.
        program: String,
        /// File being formatted.
        path: String,
        /// Captured standard error.
        stderr: String,
    },

    /// I/O error while talking to the formatter.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reformats generated source text.
pub trait Formatter {
    /// Formats the contents of `path`.
    ///
    /// # Errors
    /// Returns `FormatError` if the text could not be formatted.
    fn format(&self, path: &str, source: &str) -> Result<String, FormatError>;
}

/// Formatter backed by a `clang-format` executable.
#[derive(Debug, Clone)]
pub struct ClangFormat {
    program: String,
}

impl ClangFormat {
    /// Creates a formatter running `program`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ClangFormat {
    fn default() -> Self {
        Self::new("clang-format")
    }
}

impl Formatter for ClangFormat {
    fn format(&self, path: &str, source: &str) -> Result<String, FormatError> {
        let spawned = Command::new(&self.program)
            .arg(format!("--assume-filename={path}"))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(FormatError::FormatterUnavailable {
                    program: self.program.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        // stdin is closed before waiting; the child is reaped even if the
        // write failed.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(source.as_bytes()),
            None => Ok(()),
        };
        let output = child.wait_with_output()?;
        written?;
        if !output.status.success() {
            return Err(FormatError::Failed {
                program: self.program.clone(),
                path: path.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Formats every generated file.
///
/// Formatting is best effort: a missing formatter leaves every remaining file
/// verbatim, and a failure on one file leaves that file verbatim.
#[must_use]
pub fn format_all(formatter: &dyn Formatter, sources: GeneratedSources) -> GeneratedSources {
    let mut available = true;
    sources
        .into_inner()
        .into_iter()
        .map(|(path, contents)| {
            if !available {
                return (path, contents);
            }
            match formatter.format(&path, &contents) {
                Ok(formatted) => {
                    tracing::debug!(path = %path, "formatted");
                    (path, formatted)
                }
                Err(err @ FormatError::FormatterUnavailable { .. }) => {
                    tracing::warn!(error = %err, "writing unformatted sources");
                    available = false;
                    (path, contents)
                }
                Err(err) => {
                    tracing::warn!(path = %path, error = %err, "keeping unformatted file");
                    (path, contents)
                }
            }
        })
        .collect()
}
