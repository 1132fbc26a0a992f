//! a11y CLI - Main Entry Point
//!
//! Runs accessibility scans over YAML page specs, re-renders reports from
//! saved axe-core output and gates CI on saved run summaries.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{check, render, scan, show};

/// a11y - Accessibility scan aggregation and reporting
#[derive(Parser)]
#[command(name = "a11y")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "A11Y_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan pages and write the reports
    Scan(scan::ScanArgs),

    /// Render reports from raw axe-core result files
    Render(render::RenderArgs),

    /// Print the pages of a saved summaries file
    Show(show::ShowArgs),

    /// Apply a compliance policy to a saved summaries file
    Check(check::CheckArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    if cli.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    let passed = match cli.command {
        Commands::Scan(args) => scan::execute(args).await?,
        Commands::Render(args) => render::execute(args)?,
        Commands::Show(args) => show::execute(args)?,
        Commands::Check(args) => check::execute(args)?,
    };

    if !passed {
        std::process::exit(1);
    }

    Ok(())
}
