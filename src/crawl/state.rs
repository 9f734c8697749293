// src/crawl/state.rs
// =============================================================================
// Shared bookkeeping for one crawl.
//
// All concurrent branches of a crawl share:
// - visited:   URLs already claimed for fetching (never claimed twice)
// - filtered:  URLs accepted as results (the start URL is seeded in)
// - a cache of normalized forms, keyed by the exact input string
//
// They sit behind ONE mutex and are only reachable through methods that do
// their whole check-then-insert while holding it. The lock is never held
// across an `.await`.
// =============================================================================

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::links;

#[derive(Debug)]
struct Sets {
    visited: HashSet<String>,
    filtered: HashSet<String>,
    normalized: HashMap<String, String>,
}

/// Visited / accepted URL sets for a single crawl call.
#[derive(Debug)]
pub struct CrawlState {
    max_urls: usize,
    sets: Mutex<Sets>,
}

impl CrawlState {
    // `seed` must already be normalized
    pub fn new(seed: &str, max_urls: usize) -> Self {
        let sets = Sets {
            visited: HashSet::new(),
            filtered: HashSet::from([seed.to_string()]),
            normalized: HashMap::new(),
        };

        Self {
            max_urls,
            sets: Mutex::new(sets),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sets> {
        // The sets are plain collections; a panic elsewhere cannot leave
        // them half-updated.
        self.sets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `links::normalize`, memoized for the lifetime of this crawl.
    pub fn normalize(&self, url: &str) -> String {
        let mut sets = self.lock();
        if let Some(hit) = sets.normalized.get(url) {
            return hit.clone();
        }

        let normalized = links::normalize(url);
        sets.normalized.insert(url.to_string(), normalized.clone());
        normalized
    }

    /// True once the result set has reached `max_urls`.
    pub fn is_full(&self) -> bool {
        self.lock().filtered.len() >= self.max_urls
    }

    /// Claims `url` for fetching. Fails if it was claimed before or the
    /// result set is already full. First caller wins.
    pub fn claim(&self, url: &str) -> bool {
        let mut sets = self.lock();
        if sets.filtered.len() >= self.max_urls || sets.visited.contains(url) {
            return false;
        }
        sets.visited.insert(url.to_string())
    }

    /// Accepts `url` as a result and new frontier item. Fails if the cap is
    /// reached, or the URL is already visited or already accepted (and so
    /// already scheduled by someone else).
    pub fn accept(&self, url: &str) -> bool {
        let mut sets = self.lock();
        if sets.filtered.len() >= self.max_urls || sets.visited.contains(url) {
            return false;
        }
        sets.filtered.insert(url.to_string())
    }

    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    /// Accepted URLs, sorted and capped at `max_urls`.
    pub fn into_sorted(self) -> Vec<String> {
        let sets = self.sets.into_inner().unwrap_or_else(PoisonError::into_inner);
        let mut urls: Vec<String> = sets.filtered.into_iter().collect();
        urls.sort();
        urls.truncate(self.max_urls);
        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "https://example.com";

    #[test]
    fn test_seed_is_accepted_but_not_visited() {
        let state = CrawlState::new(SEED, 10);
        assert!(!state.accept(SEED));
        assert!(state.claim(SEED));
        assert_eq!(state.into_sorted(), vec![SEED]);
    }

    #[test]
    fn test_claim_only_once() {
        let state = CrawlState::new(SEED, 10);
        assert!(state.claim("https://example.com/a"));
        assert!(!state.claim("https://example.com/a"));
        assert_eq!(state.visited_count(), 1);
    }

    #[test]
    fn test_accept_skips_visited_and_duplicates() {
        let state = CrawlState::new(SEED, 10);
        assert!(state.claim(SEED));
        assert!(!state.accept(SEED));

        assert!(state.accept("https://example.com/a"));
        assert!(!state.accept("https://example.com/a"));
    }

    #[test]
    fn test_cap_blocks_accept_and_claim() {
        let state = CrawlState::new(SEED, 2);
        assert!(state.accept("https://example.com/a"));
        assert!(state.is_full());
        assert!(!state.accept("https://example.com/b"));
        assert!(!state.claim("https://example.com/a"));
        assert_eq!(
            state.into_sorted(),
            vec!["https://example.com", "https://example.com/a"]
        );
    }

    #[test]
    fn test_normalize_is_cached() {
        let state = CrawlState::new(SEED, 10);
        let first = state.normalize("https://EXAMPLE.com/x/?q=1");
        let second = state.normalize("https://EXAMPLE.com/x/?q=1");
        assert_eq!(first, "https://example.com/x");
        assert_eq!(first, second);
        assert_eq!(state.lock().normalized.len(), 1);
    }

    #[test]
    fn test_concurrent_accept_never_overshoots() {
        use std::sync::Arc;
        use std::thread;

        let state = Arc::new(CrawlState::new(SEED, 25));
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let state = state.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        state.accept(&format!("https://example.com/{worker}/{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let state = Arc::try_unwrap(state).unwrap();
        assert_eq!(state.into_sorted().len(), 25);
    }
}
