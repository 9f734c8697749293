// src/config.rs
// =============================================================================
// Crawler configuration.
//
// One CrawlerConfig is built per crawl and never mutated afterwards. It can
// come from three places:
// - CrawlerConfig::default() (the values the crawler has always used)
// - a JSON file (every field optional, missing ones fall back to defaults)
// - command-line flags (see cli.rs), applied on top of either of the above
//
// Durations are written as fractional seconds in JSON: "rate_limit": 0.25
// =============================================================================

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::error::ConfigError;

/// Browser-like identity sent with every request. Some servers answer
/// obvious bots with a 403 or an empty page.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Limits and politeness settings for one crawl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// How many link hops away from the start URL the crawl may go.
    /// 0 = only the start URL itself.
    pub max_depth: usize,

    /// Hard cap on the number of URLs returned (the start URL included).
    pub max_urls: usize,

    /// Minimum spacing between two outgoing requests, across all in-flight
    /// fetches.
    #[serde(with = "seconds")]
    pub rate_limit: Duration,

    /// Connect + read timeout for a single page fetch.
    #[serde(with = "seconds")]
    pub timeout: Duration,

    /// How many fetches may be in flight at once.
    pub max_concurrent: usize,

    /// Value of the User-Agent header.
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_urls: 10,
            rate_limit: Duration::from_millis(500),
            timeout: Duration::from_secs(10),
            max_concurrent: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlerConfig {
    /// Checks the config before a crawl starts. Misuse fails here with a
    /// descriptive error instead of quietly producing an empty crawl.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_urls == 0 {
            return Err(ConfigError::ZeroMaxUrls);
        }
        if self.max_concurrent == 0 {
            return Err(ConfigError::ZeroMaxConcurrent);
        }
        // The concurrency gate is a tokio semaphore, which has a hard limit
        if self.max_concurrent > Semaphore::MAX_PERMITS {
            return Err(ConfigError::MaxConcurrentTooLarge {
                got: self.max_concurrent,
                max: Semaphore::MAX_PERMITS,
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Parses a config from JSON. Fields that are absent keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// (De)serializes a Duration as a float number of seconds
mod seconds {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|_| de::Error::custom(format!("invalid duration in seconds: {secs}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlerConfig::default();
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.max_urls, 10);
        assert_eq!(config.rate_limit, Duration::from_millis(500));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_concurrent, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = CrawlerConfig {
            max_urls: 0,
            ..CrawlerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxUrls));

        let config = CrawlerConfig {
            max_concurrent: 0,
            ..CrawlerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxConcurrent));

        let config = CrawlerConfig {
            timeout: Duration::ZERO,
            ..CrawlerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_validate_rejects_oversized_concurrency() {
        let config = CrawlerConfig {
            max_concurrent: usize::MAX,
            ..CrawlerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::MaxConcurrentTooLarge {
                got: usize::MAX,
                max: Semaphore::MAX_PERMITS,
            })
        );

        let config = CrawlerConfig {
            max_concurrent: Semaphore::MAX_PERMITS,
            ..CrawlerConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_depth_and_rate_limit_are_fine() {
        let config = CrawlerConfig {
            max_depth: 0,
            rate_limit: Duration::ZERO,
            ..CrawlerConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = CrawlerConfig::from_json(r#"{"max_urls": 50, "rate_limit": 0.25}"#).unwrap();
        assert_eq!(config.max_urls, 50);
        assert_eq!(config.rate_limit, Duration::from_millis(250));
        // Untouched fields keep their defaults
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_from_json_rejects_negative_duration() {
        assert!(CrawlerConfig::from_json(r#"{"timeout": -1.0}"#).is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_values() {
        let config = CrawlerConfig {
            max_depth: 3,
            timeout: Duration::from_millis(1500),
            ..CrawlerConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(CrawlerConfig::from_json(&json).unwrap(), config);
    }
}
