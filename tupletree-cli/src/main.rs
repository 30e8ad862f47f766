//! `tuple-tree-generate-cpp`: generates C++ tuple tree headers from a schema.

mod args;
mod config;
mod format;
mod output;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use config::{FileConfig, resolve_options};
use format::{ClangFormat, format_all};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let options = resolve_options(cli, file_config)?;
    tracing::debug!(?options, "resolved options");

    let sources = tupletree::generate_from_file(&cli.schema, &options)
        .with_context(|| format!("failed to generate from {}", cli.schema.display()))?;

    let sources = if cli.no_format {
        sources
    } else {
        format_all(&ClangFormat::new(&cli.formatter), sources)
    };

    let written = output::write_sources(&cli.output_dir, &sources)?;
    tracing::info!(
        files = written.len(),
        output_dir = %cli.output_dir.display(),
        "generation complete"
    );
    Ok(())
}
