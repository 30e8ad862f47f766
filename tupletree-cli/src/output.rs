//! Writing generated sources to disk.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tupletree::GeneratedSources;

/// Writes every generated file under `dir`, creating directories as needed.
///
/// Files are written one at a time; a failure leaves earlier files in place.
///
/// # Errors
/// Returns an error if a directory cannot be created or a file cannot be
/// written.
pub fn write_sources(dir: &Path, sources: &GeneratedSources) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(sources.len());
    for (path, contents) in sources.iter() {
        let target = dir.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&target, contents)
            .with_context(|| format!("failed to write {}", target.display()))?;
        tracing::info!(path = %target.display(), bytes = contents.len(), "wrote file");
        written.push(target);
    }
    Ok(written)
}
