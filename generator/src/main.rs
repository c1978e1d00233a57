mod cli;
mod generators;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use xcm_xsd::{compile_content_models, FileImportResolver, LoadOptions, SchemaRegistry};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let options = LoadOptions {
        allow_dtd: cli.allow_dtd,
    };
    let (registry, _) = SchemaRegistry::load(&cli.input, &FileImportResolver, options)
        .with_context(|| format!("failed to load schema {}", cli.input))?;
    let models = compile_content_models(&registry).context("failed to compile content models")?;
    tracing::info!(models = models.len(), generator = ?cli.generator, "generating output");

    let output = cli.generator.generate(&models);
    print!("{output}");
    Ok(())
}
