// src/crawl/limiter.rs
// =============================================================================
// Concurrency gate + global request spacing.
//
// Every fetch goes through `RateLimiter::acquire()` first:
// 1. Take a semaphore permit (at most `max_concurrent` holders at a time)
// 2. Lock the "last dispatch" timestamp, sleep until `min_delay` has passed
//    since it, stamp it with "now", unlock
// 3. Hand back a guard; the permit is released when the guard is dropped,
//    i.e. after the fetch has finished
//
// The timestamp stays locked while sleeping, so two fetchers can never both
// see a stale timestamp and fire at the same moment.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Bounds in-flight fetches and spaces out their dispatch.
#[derive(Debug)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    min_delay: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// - `max_concurrent`: maximum number of guards alive at once
    /// - `min_delay`: minimum time between two successful `acquire` calls
    pub fn new(max_concurrent: usize, min_delay: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            min_delay,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Waits for a free slot and for the spacing delay. Returns `None` only
    /// if the underlying semaphore was closed.
    pub async fn acquire(&self) -> Option<RateLimitGuard> {
        let permit = self.semaphore.clone().acquire_owned().await.ok()?;

        {
            let mut last = self.last_dispatch.lock().await;
            if let Some(previous) = *last {
                let elapsed = previous.elapsed();
                if elapsed < self.min_delay {
                    tokio::time::sleep(self.min_delay - elapsed).await;
                }
            }
            *last = Some(Instant::now());
        }

        Some(RateLimitGuard { _permit: permit })
    }

    /// Number of slots not currently held.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Holds one concurrency slot until dropped.
#[derive(Debug)]
pub struct RateLimitGuard {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_acquire_is_immediate() {
        let limiter = RateLimiter::new(1, Duration::from_secs(5));
        let start = Instant::now();
        let _guard = limiter.acquire().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatches_are_spaced() {
        let limiter = RateLimiter::new(4, Duration::from_millis(500));
        let start = Instant::now();

        let mut stamps = Vec::new();
        for _ in 0..4 {
            let _guard = limiter.acquire().await.unwrap();
            stamps.push(start.elapsed());
        }

        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(500));
        }
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_acquirers_do_not_burst() {
        let limiter = Arc::new(RateLimiter::new(8, Duration::from_millis(100)));
        let start = Instant::now();

        let tasks: Vec<_> = (0..5)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    let _guard = limiter.acquire().await.unwrap();
                    start.elapsed()
                })
            })
            .collect();

        let mut stamps = Vec::new();
        for task in tasks {
            stamps.push(task.await.unwrap());
        }
        stamps.sort();

        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(100));
        }
    }

    #[tokio::test]
    async fn test_slots_are_bounded_and_released() {
        let limiter = RateLimiter::new(2, Duration::ZERO);
        let g1 = limiter.acquire().await.unwrap();
        let _g2 = limiter.acquire().await.unwrap();
        assert_eq!(limiter.available(), 0);

        drop(g1);
        assert_eq!(limiter.available(), 1);
        let _g3 = limiter.acquire().await.unwrap();
        assert_eq!(limiter.available(), 0);
    }
}
