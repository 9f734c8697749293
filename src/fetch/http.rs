// src/fetch/http.rs
// =============================================================================
// This module downloads pages over HTTP and returns the links they contain.
//
// Key functionality:
// - One reqwest Client per crawler (connection pooling, shared headers)
// - Per-request timeout covering connect + read
// - Browser-like User-Agent / Accept / Accept-Language headers, fixed for the
//   whole session
// - Non-2xx answers are not errors: they just have no links
//
// The PageFetcher trait is the seam between the coordinator and the network.
// Tests plug in fake fetchers that serve a synthetic link graph.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use tracing::debug;

use super::html::extract_hrefs;
use crate::config::CrawlerConfig;
use crate::error::{CrawlError, FetchError};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9";
const ACCEPT_ENGLISH: &str = "en-US,en;q=0.5";

/// Something that can turn a page URL into the raw hrefs on that page.
///
/// Implementations should return `Ok(vec![])` for pages that exist but are
/// not useful (non-2xx status) and `Err` for transport failures. Either way
/// the crawl continues.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError>;
}

/// The real fetcher: HTTP GET with reqwest, href extraction with scraper.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the HTTP client once for the whole crawl
    //
    // Fails only if the configured User-Agent is not a valid header value
    // or the TLS backend cannot be initialised.
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_ENGLISH));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            // Still counts as visited, it just leads nowhere
            debug!(url, status = status.as_u16(), "non-success status, no links");
            return Ok(Vec::new());
        }

        let html = response.text().await?;
        let links = extract_hrefs(&html);
        debug!(url, links = links.len(), "page fetched");

        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_with_timeout(timeout: Duration) -> HttpFetcher {
        let config = CrawlerConfig {
            timeout,
            ..CrawlerConfig::default()
        };
        HttpFetcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_extracts_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"<html><body><a href="/a">A</a><a href="https://other.com">O</a></body></html>"#,
                "text/html",
            ))
            .mount(&server)
            .await;

        let fetcher = fetcher_with_timeout(Duration::from_secs(5));
        let links = fetcher.fetch_links(&format!("{}/", server.uri())).await.unwrap();
        assert_eq!(links, vec!["/a", "https://other.com"]);
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", crate::config::DEFAULT_USER_AGENT))
            .and(header("accept", ACCEPT_HTML))
            .and(header("accept-language", ACCEPT_ENGLISH))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"<a href="/ok">ok</a>"#, "text/html"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher_with_timeout(Duration::from_secs(5));
        let links = fetcher.fetch_links(&server.uri()).await.unwrap();
        assert_eq!(links, vec!["/ok"]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_empty_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_raw(r#"<a href="/a">A</a>"#, "text/html"),
            )
            .mount(&server)
            .await;

        let fetcher = fetcher_with_timeout(Duration::from_secs(5));
        let links = fetcher.fetch_links(&server.uri()).await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = fetcher_with_timeout(Duration::from_millis(200));
        let result = fetcher.fetch_links(&server.uri()).await;
        assert_eq!(result, Err(FetchError::Timeout));
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        // Grab a free port, then close the server so nothing listens there
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let fetcher = fetcher_with_timeout(Duration::from_secs(2));
        assert!(fetcher.fetch_links(&uri).await.is_err());
    }

    #[test]
    fn test_invalid_user_agent_fails_fast() {
        let config = CrawlerConfig {
            user_agent: "bad\nagent".to_string(),
            ..CrawlerConfig::default()
        };
        assert!(matches!(HttpFetcher::new(&config), Err(CrawlError::Client(_))));
    }
}
