// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (to stderr, so JSON on stdout stays clean)
// 2. Parse command-line arguments using clap and build the crawler config
// 3. Run the crawl; Ctrl-C stops it early and still prints what was found
// 4. Print the URLs as a list or JSON
// 5. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use site_crawler::{CrawlReport, Crawler};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins if set; otherwise the crawler logs at info
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("site_crawler=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.crawler_config()?;

    let crawler = Crawler::new(config).context("failed to set up crawler")?;

    // Ctrl-C cancels the crawl instead of killing the process, so the
    // partial result still gets printed
    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, finishing in-flight requests");
            on_ctrl_c.cancel();
        }
    });

    let report = crawler
        .crawl_with_cancel(&cli.start_url, cancel)
        .await
        .with_context(|| format!("failed to crawl {}", cli.start_url))?;

    info!(urls = report.urls.len(), "done");
    print_report(&report, cli.json)
}

// Prints the report either as a plain list or JSON
fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for url in &report.urls {
        println!("{}", url);
    }

    eprintln!();
    eprintln!("Summary:");
    eprintln!("   URLs found:     {}", report.urls.len());
    eprintln!("   Pages fetched:  {}", report.pages_fetched);
    eprintln!("   Failed fetches: {}", report.failed_fetches);
    if report.cancelled {
        eprintln!("   (crawl was interrupted)");
    }

    Ok(())
}
