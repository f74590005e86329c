//! Forumharvest main entry point
//!
//! Command-line interface for scanning forum topics and boards.

use clap::Parser;
use forumharvest::config::{load_config_with_hash, Config};
use forumharvest::{Orchestrator, Outcome, Progress};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Forumharvest: a resumable forum scraper for file-hoster download links
///
/// Forumharvest walks the pages of a forum topic (or a whole board),
/// extracts posts carrying file-hosting download links, verifies that the
/// links are still alive, and stores the results as JSON. Pages scanned in
/// earlier runs are skipped, so interrupted scans resume where they left
/// off.
#[derive(Parser, Debug)]
#[command(name = "forumharvest")]
#[command(version = "1.0.0")]
#[command(about = "A resumable forum download-link scraper", long_about = None)]
struct Cli {
    /// Topic (or, with --board, board) URL to scan
    #[arg(value_name = "URL")]
    url: String,

    /// Pages to scan: "*", "3", "2-5", "8-*", or a comma-separated mix
    #[arg(short, long, default_value = "*")]
    pages: String,

    /// Treat URL as a board and scan every topic it lists
    #[arg(long)]
    board: bool,

    /// Board pages to walk when --board is set
    #[arg(long, default_value = "*", requires = "board")]
    board_pages: String,

    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Resolve and list the page URLs without scanning them
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let orchestrator = Arc::new(Orchestrator::new(config)?);

    tracing::info!("Resolving pages for {}", cli.url);
    let urls = if cli.board {
        orchestrator
            .resolve_board(&cli.url, &cli.board_pages, &cli.pages)
            .await?
    } else {
        orchestrator.resolve_topic_pages(&cli.url, &cli.pages).await?
    };

    if cli.dry_run {
        println!("Would scan {} pages:", urls.len());
        for url in &urls {
            println!("  {}", url);
        }
        return Ok(());
    }

    // First ctrl-c stops the scan gracefully; partial results are saved.
    {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping after in-flight pages");
                orchestrator.stop().await;
            }
        });
    }

    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_progress(progress_rx, cli.quiet));

    let report = orchestrator.run_scan(&urls, progress_tx).await;
    let _ = printer.await;
    let report = report?;

    match report.outcome {
        Outcome::Completed { new_posts } => {
            println!(
                "Scan complete: {} posts extracted, {} new",
                report.posts.len(),
                new_posts
            );
        }
        Outcome::NothingToDo => {
            println!("Nothing to do: all requested pages were already scanned");
        }
        Outcome::Stopped => {
            println!(
                "Scan stopped: {} posts from finished pages were saved",
                report.posts.len()
            );
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("forumharvest=info,warn"),
            1 => EnvFilter::new("forumharvest=debug,info"),
            2 => EnvFilter::new("forumharvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Prints progress events until the scan drops its sender
async fn print_progress(mut rx: mpsc::UnboundedReceiver<Progress>, quiet: bool) {
    while let Some(progress) = rx.recv().await {
        if !quiet {
            println!(
                "Progress: {}% ({}/{} pages)",
                progress.percent, progress.processed, progress.total
            );
        }
    }
}
