// src/lib.rs
// =============================================================================
// site-crawler: discovers the pages of a website.
//
// Given a start URL, the crawler follows same-domain https links and returns
// a sorted, deduplicated list of page URLs, within hard limits on depth,
// result count, concurrency and request rate.
//
// The returned list is meant for a document loader that downloads each page
// again on its own. The crawler does not keep or pass on the HTML it fetched
// while discovering links, so every page is fetched twice overall.
//
// Modules:
// - config: CrawlerConfig and its defaults
// - crawl: the coordinator, rate limiter and shared crawl state
// - fetch: the PageFetcher trait, HTTP implementation, href extraction
// - links: URL normalization, validation, resolution
// - error: error types
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod links;

pub use config::CrawlerConfig;
pub use crawl::{CrawlReport, Crawler};
pub use error::{ConfigError, CrawlError, FetchError};
pub use fetch::{HttpFetcher, PageFetcher};

// Crawls `url` with the default configuration
//
// Example:
//   let urls = site_crawler::fetch_urls("https://example.com").await?;
//   // -> ["https://example.com", "https://example.com/about", ...]
pub async fn fetch_urls(url: &str) -> Result<Vec<String>, CrawlError> {
    Crawler::new(CrawlerConfig::default())?.crawl(url).await
}
