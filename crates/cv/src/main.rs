//! CV CLI - Markdown CV renderer.
//!
//! Provides commands for:
//! - `render`: Render a CV written in the extended Markdown dialect to HTML
//! - `extensions`: List the active grammar extensions in precedence order

mod commands;
mod document;
mod engine;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExtensionsArgs, RenderArgs};
use output::Output;

/// CV - Markdown CV renderer.
#[derive(Parser)]
#[command(name = "cv", version, about)]
struct Cli {
    /// Enable verbose output (debug logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a CV document to HTML.
    Render(RenderArgs),
    /// List active extensions in precedence order.
    Extensions(ExtensionsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Extensions(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
