// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every crawler setting can come from three places, lowest priority first:
// 1. built-in defaults (CrawlerConfig::default())
// 2. a JSON config file given with --config
// 3. individual flags like --max-depth
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Option<T>: a flag the user did not pass is None and leaves the
//   lower-priority value alone
// - Derive macros: Automatically generate code for our types
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use site_crawler::CrawlerConfig;
use std::path::PathBuf;
use std::time::Duration;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "site-crawler",
    version,
    about = "Discover the pages of a website, politely",
    long_about = "site-crawler follows same-domain https links from a start URL and prints \
                  the sorted list of page URLs it found, within limits on depth, result \
                  count, concurrency and request rate."
)]
pub struct Cli {
    /// Website URL to start from (e.g., https://example.com)
    pub start_url: String,

    /// Maximum number of link hops from the start URL
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Maximum number of URLs to return (start URL included)
    #[arg(long)]
    pub max_urls: Option<usize>,

    /// Minimum seconds between two requests
    #[arg(long, value_name = "SECS")]
    pub rate_limit: Option<f64>,

    /// Timeout in seconds for a single page fetch
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Maximum number of fetches in flight at once
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// JSON file with crawler settings; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output results in JSON format instead of a list
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    // Builds the final CrawlerConfig from defaults, the config file and flags
    pub fn crawler_config(&self) -> Result<CrawlerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                CrawlerConfig::from_json(&text)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            None => CrawlerConfig::default(),
        };

        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(max_urls) = self.max_urls {
            config.max_urls = max_urls;
        }
        if let Some(secs) = self.rate_limit {
            config.rate_limit = seconds("--rate-limit", secs)?;
        }
        if let Some(secs) = self.timeout {
            config.timeout = seconds("--timeout", secs)?;
        }
        if let Some(max_concurrent) = self.max_concurrent {
            config.max_concurrent = max_concurrent;
        }

        Ok(config)
    }
}

fn seconds(flag: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("{flag} must be a non-negative number of seconds"))
}
