//! Attestor CLI - summarize audit reports through an external LLM oracle.

use attestor_cli::{analyze, Cli, Command, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> attestor_cli::Result<()> {
    let cli = Cli::parse();

    let color_enabled = !cli.no_color;
    let formatter = Formatter::new(cli.format, color_enabled);

    match cli.command {
        Command::Analyze(args) => analyze::execute(args, &formatter).await?,
    }

    Ok(())
}
