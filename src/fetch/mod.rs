// src/fetch/mod.rs
// =============================================================================
// This module contains the page fetcher.
//
// Submodules:
// - http: the PageFetcher trait and its reqwest implementation
// - html: pulls raw hrefs out of an HTML body
//
// A fetcher only answers one question: "which hrefs are on this page?".
// It knows nothing about depth, domains or what has been visited.
// =============================================================================

mod html;
mod http;

pub use html::extract_hrefs;
pub use http::{HttpFetcher, PageFetcher};
