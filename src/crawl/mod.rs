// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Recursive fan-out from a start URL, bounded by depth and result count
// - Same-domain restriction (never leaves the start URL's host)
// - At most `max_concurrent` fetches in flight at once
// - Polite crawling: a global minimum delay between two requests
// - Cooperative cancellation
//
// Submodules:
// - coordinator: the traversal itself (Crawler, CrawlReport)
// - limiter: concurrency gate + request spacing
// - state: visited/result sets shared by all branches of one crawl
// =============================================================================

mod coordinator;
mod limiter;
mod state;

pub use coordinator::{CrawlReport, Crawler};
pub use limiter::{RateLimitGuard, RateLimiter};
