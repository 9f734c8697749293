// src/crawl/coordinator.rs
// =============================================================================
// This module drives a crawl from a start URL.
//
// How it works:
// 1. Normalize the start URL; it is the first result
// 2. visit(url, depth):
//    - stop if too deep, already visited, the result set is full, or the
//      crawl was cancelled
//    - mark the URL visited and fetch it (through the concurrency gate and
//      the rate limiter)
//    - for every href on the page, in document order: resolve, normalize,
//      keep it only if it is https, same-domain and new
//    - every kept link is a result immediately and gets its own child visit
//    - all child visits of this page run concurrently and are awaited before
//      this visit returns
// 3. Return the results sorted, capped at max_urls
//
// Failure isolation:
// - a fetch that errors or times out is logged and treated as "no links"
// - a single page never aborts the crawl; the worst case result is just the
//   start URL
// =============================================================================

use futures::future::{join_all, BoxFuture};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::limiter::RateLimiter;
use super::state::CrawlState;
use crate::config::CrawlerConfig;
use crate::error::CrawlError;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::links::{is_same_domain, is_valid, normalize, resolve_link};

/// What a finished crawl found, plus a few counters for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    /// Normalized URLs, sorted, at most `max_urls` of them.
    pub urls: Vec<String>,
    /// Fetches actually dispatched.
    pub pages_fetched: usize,
    /// Dispatched fetches that failed or timed out.
    pub failed_fetches: usize,
    /// True if the crawl was stopped through its cancellation token.
    pub cancelled: bool,
}

/// A reusable crawler. Each `crawl*` call gets its own visited/result sets,
/// rate limiter and concurrency gate, so calls never share state.
pub struct Crawler<F = HttpFetcher> {
    config: CrawlerConfig,
    fetcher: F,
}

impl Crawler<HttpFetcher> {
    /// Crawler backed by the reqwest fetcher.
    pub fn new(config: CrawlerConfig) -> Result<Self, CrawlError> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }
}

impl<F: PageFetcher> Crawler<F> {
    /// Crawler backed by any `PageFetcher`.
    pub fn with_fetcher(config: CrawlerConfig, fetcher: F) -> Result<Self, CrawlError> {
        config.validate()?;
        Ok(Self { config, fetcher })
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawls from `start_url` and returns the sorted, capped URL list.
    ///
    /// Fails only when `start_url` cannot be crawled at all. Everything that
    /// goes wrong during the crawl is absorbed.
    pub async fn crawl(&self, start_url: &str) -> Result<Vec<String>, CrawlError> {
        Ok(self.crawl_report(start_url).await?.urls)
    }

    /// Like `crawl`, with fetch counters.
    pub async fn crawl_report(&self, start_url: &str) -> Result<CrawlReport, CrawlError> {
        self.crawl_with_cancel(start_url, CancellationToken::new())
            .await
    }

    /// Like `crawl_report`, stoppable from outside.
    ///
    /// After `cancel` fires no new fetch is dispatched; fetches already in
    /// flight finish, and whatever was found so far is returned.
    pub async fn crawl_with_cancel(
        &self,
        start_url: &str,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        let start = check_start_url(start_url)?;

        info!(
            start = %start,
            max_depth = self.config.max_depth,
            max_urls = self.config.max_urls,
            "starting crawl"
        );
        let began = Instant::now();

        let run = CrawlRun {
            config: &self.config,
            fetcher: &self.fetcher,
            limiter: RateLimiter::new(self.config.max_concurrent, self.config.rate_limit),
            state: CrawlState::new(&start, self.config.max_urls),
            start: start.clone(),
            cancel,
            pages_fetched: AtomicUsize::new(0),
            failed_fetches: AtomicUsize::new(0),
        };

        run.visit(start, 0).await;

        let report = run.into_report();
        info!(
            urls = report.urls.len(),
            pages_fetched = report.pages_fetched,
            failed_fetches = report.failed_fetches,
            cancelled = report.cancelled,
            elapsed_ms = began.elapsed().as_millis() as u64,
            "crawl finished"
        );

        Ok(report)
    }
}

// The start URL has to be absolute and have a host, otherwise there is no
// domain to stay inside of. It is also returned as the first result, so it
// has to pass the same https check as every discovered link.
fn check_start_url(start_url: &str) -> Result<String, CrawlError> {
    let parsed = Url::parse(start_url).map_err(|e| CrawlError::InvalidStartUrl {
        url: start_url.to_string(),
        reason: e.to_string(),
    })?;

    if parsed.host_str().is_none() {
        return Err(CrawlError::InvalidStartUrl {
            url: start_url.to_string(),
            reason: "URL has no host".to_string(),
        });
    }

    let start = normalize(start_url);
    if !is_valid(&start) {
        return Err(CrawlError::InvalidStartUrl {
            url: start_url.to_string(),
            reason: "start URL must be https".to_string(),
        });
    }

    Ok(start)
}

// Everything that lives exactly as long as one crawl call
struct CrawlRun<'a, F> {
    config: &'a CrawlerConfig,
    fetcher: &'a F,
    limiter: RateLimiter,
    state: CrawlState,
    start: String,
    cancel: CancellationToken,
    pages_fetched: AtomicUsize,
    failed_fetches: AtomicUsize,
}

impl<'a, F: PageFetcher> CrawlRun<'a, F> {
    // Boxed because it is recursive: a visit awaits the visits of its children
    fn visit<'s>(&'s self, url: String, depth: usize) -> BoxFuture<'s, ()> {
        Box::pin(async move {
            if depth > self.config.max_depth || self.cancel.is_cancelled() {
                return;
            }
            if !self.state.claim(&url) {
                return;
            }

            // Links found here would be one hop too far; nothing to gain by
            // fetching the page
            if depth == self.config.max_depth {
                debug!(url = %url, depth, "depth limit reached, not fetching");
                return;
            }

            let Some(links) = self.fetch(&url).await else {
                return;
            };

            let mut children = Vec::new();
            for href in links {
                if self.state.is_full() {
                    break;
                }

                let Some(absolute) = resolve_link(&url, &href) else {
                    continue;
                };
                let link = self.state.normalize(&absolute);

                if !is_valid(&link) || !is_same_domain(&self.start, &link) {
                    continue;
                }

                if self.state.accept(&link) {
                    children.push(self.visit(link, depth + 1));
                }
            }

            if !children.is_empty() {
                debug!(url = %url, depth, children = children.len(), "following links");
                join_all(children).await;
            }
        })
    }

    // One fetch through the gate, the limiter and the timeout.
    //
    // Returns None if the crawl was cancelled before the fetch could be
    // dispatched. Any failure after dispatch becomes an empty link list.
    async fn fetch(&self, url: &str) -> Option<Vec<String>> {
        let _guard = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            guard = self.limiter.acquire() => guard,
        }?;

        self.pages_fetched.fetch_add(1, Ordering::SeqCst);
        debug!(url, free_slots = self.limiter.available(), "dispatching fetch");

        let fetched = tokio::time::timeout(self.config.timeout, self.fetcher.fetch_links(url)).await;
        match fetched {
            Ok(Ok(links)) => Some(links),
            Ok(Err(e)) => {
                warn!(url, error = %e, "fetch failed, skipping page");
                self.failed_fetches.fetch_add(1, Ordering::SeqCst);
                Some(Vec::new())
            }
            Err(_) => {
                warn!(url, timeout = ?self.config.timeout, "fetch timed out, skipping page");
                self.failed_fetches.fetch_add(1, Ordering::SeqCst);
                Some(Vec::new())
            }
        }
    }

    fn into_report(self) -> CrawlReport {
        debug!(visited = self.state.visited_count(), "collecting results");
        CrawlReport {
            cancelled: self.cancel.is_cancelled(),
            pages_fetched: self.pages_fetched.into_inner(),
            failed_fetches: self.failed_fetches.into_inner(),
            urls: self.state.into_sorted(),
        }
    }
}
