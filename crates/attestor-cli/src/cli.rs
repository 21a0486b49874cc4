//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Attestor CLI - Summarize audit reports with an external LLM oracle.
#[derive(Debug, Parser)]
#[command(name = "attestor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Rendered tables (default)
    Table,
    /// JSON object
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze an extracted-text audit report
    Analyze(AnalyzeArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Path to the report text (already extracted from its source format)
    pub file: PathBuf,

    /// Oracle API endpoint
    #[arg(long, env = "ATTESTOR_ENDPOINT", default_value = "http://localhost:11434")]
    pub endpoint: String,

    /// Oracle model name
    #[arg(short, long, env = "ATTESTOR_MODEL", default_value = "llama3")]
    pub model: String,

    /// Pipeline configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the maximum excerpt size (characters)
    #[arg(long)]
    pub max_excerpt_size: Option<usize>,

    /// Override the excerpt overlap (characters)
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Override the number of concurrent oracle calls
    #[arg(long)]
    pub concurrency: Option<usize>,
}
