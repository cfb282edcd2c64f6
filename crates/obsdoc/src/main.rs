//! obsdoc - observability documentation generator
//!
//! Scans a Java source tree for documentation enums and writes the
//! extracted metrics, spans and conventions as AsciiDoc or JSON.

use anyhow::{Context, Result};
use clap::Parser;
use obsdoc::{create_renderers, write_all, DocsGenerator, GeneratorConfig, OutputFormat, ParserConfig};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "obsdoc", version, about = "Generate observability documentation from Java sources")]
struct Cli {
    /// Root directory of the Java sources
    root: PathBuf,

    /// Regex matched against full file paths; only matching files are scanned
    #[arg(short, long, default_value = ".*")]
    include: String,

    /// Directory the documentation files are written to
    #[arg(short, long, default_value = "./build/docs")]
    output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "adoc")]
    format: OutputFormat,

    /// Parse and extract files in parallel
    #[arg(long)]
    parallel: bool,

    /// Worker threads when running in parallel
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Fail on files with syntax errors instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = GeneratorConfig::new(&cli.root)
        .with_inclusion_pattern(cli.include.as_str())
        .with_parallel(cli.parallel)
        .with_num_threads(cli.threads)
        .with_parser_config(ParserConfig::default().with_strict(cli.strict));

    let set = DocsGenerator::new(config)
        .generate()
        .with_context(|| format!("Failed to generate documentation for {}", cli.root.display()))?;

    let written = write_all(&set, &create_renderers(cli.format), &cli.output)
        .with_context(|| format!("Failed to write documentation to {}", cli.output.display()))?;

    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
