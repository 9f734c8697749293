// src/error.rs
// =============================================================================
// Error types for the crawler library.
//
// Only two kinds of errors ever reach the caller of `crawl`:
// - a bad configuration (caught before any request is sent)
// - a start URL that cannot be crawled at all
//
// Everything that goes wrong DURING a crawl (timeouts, 500s, broken HTML,
// off-site links) is recovered locally and never surfaces here. FetchError
// exists so fetchers can say what went wrong; the coordinator logs it and
// carries on.
// =============================================================================

use thiserror::Error;

/// A `CrawlerConfig` that cannot drive a crawl.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_urls must be at least 1")]
    ZeroMaxUrls,

    #[error("max_concurrent must be at least 1")]
    ZeroMaxConcurrent,

    #[error("max_concurrent must be at most {max}, got {got}")]
    MaxConcurrentTooLarge { got: usize, max: usize },

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Errors returned by `Crawler` construction and `crawl`.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid crawler configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid start URL '{url}': {reason}")]
    InvalidStartUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Why a single page fetch produced no links.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    // Timeouts and refused connections get their own variants; everything
    // else (TLS, redirects, body decoding) is a generic request failure.
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else {
            FetchError::Request(error.to_string())
        }
    }
}
