use dashmap::DashMap;
use std::sync::Arc;
use tokio::time::{Duration, Instant, interval};
use tracing::{debug, info};

use crate::metrics::TRACKED_CLIENTS;
use crate::rate_limit::{CAPACITY, TokenBucket};

// Per-client rate limiter - one bucket per client key, created on first request.
// Each bucket is only touched while its shard lock is held.
#[derive(Debug, Default)]
pub struct RateLimiterRegistry {
    buckets: DashMap<String, TokenBucket>,
}

impl RateLimiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_allowed(&self, key: &str) -> bool {
        let now = Instant::now();

        // fast path, no allocation for known keys
        if let Some(mut bucket) = self.buckets.get_mut(key) {
            let allowed = bucket.try_consume(now);
            log_decision(key, allowed);
            return allowed;
        }

        // entry() holds the shard lock, so racing first requests share one bucket
        let mut bucket = self.buckets.entry(key.to_owned()).or_insert_with(|| {
            info!(client = %key, "new bucket for client");
            TokenBucket::new(now)
        });
        let allowed = bucket.try_consume(now);
        log_decision(key, allowed);
        allowed
    }

    pub fn seconds_to_wait_for_refill(&self, key: &str) -> u64 {
        match self.buckets.get_mut(key) {
            Some(mut bucket) => bucket.seconds_until_refill(Instant::now()),
            None => 0, // never limited yet
        }
    }

    pub fn available_tokens(&self, key: &str) -> u32 {
        match self.buckets.get_mut(key) {
            Some(mut bucket) => bucket.available_tokens(Instant::now()),
            None => CAPACITY,
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Drops every bucket whose refill period is over.
    ///
    /// Those buckets would come back full on their next access anyway, so the
    /// registry answers exactly the same before and after. Returns how many
    /// were removed.
    pub fn evict_refilled(&self, now: Instant) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| !bucket.is_refilled(now));
        before.saturating_sub(self.buckets.len())
    }
}

fn log_decision(key: &str, allowed: bool) {
    debug!(
        client = %key,
        "rate limit check: {}",
        if allowed { "ALLOWED" } else { "BLOCKED" }
    );
}

// Sweeper - keeps the map from growing forever with one-off clients
pub async fn idle_sweeper(limiter: Arc<RateLimiterRegistry>, sweep_interval: Duration) {
    let mut interval = interval(sweep_interval);

    info!(interval = ?sweep_interval, "bucket sweeper started");

    loop {
        interval.tick().await;
        if limiter.is_empty() {
            continue;
        }

        let removed = limiter.evict_refilled(Instant::now());
        TRACKED_CLIENTS.set(limiter.len() as f64);

        if removed > 0 {
            debug!(removed, remaining = limiter.len(), "swept refilled buckets");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::REFILL_PERIOD;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn allows_requests_within_limit() {
        let limiter = RateLimiterRegistry::new();
        for i in 0..CAPACITY {
            assert!(limiter.is_allowed("192.168.1.1"), "request {} should be allowed", i + 1);
        }
    }

    #[test]
    fn blocks_request_past_limit() {
        let limiter = RateLimiterRegistry::new();
        for _ in 0..CAPACITY {
            limiter.is_allowed("192.168.1.2");
        }
        assert!(!limiter.is_allowed("192.168.1.2"), "6th request should be blocked");
        assert_eq!(limiter.available_tokens("192.168.1.2"), 0);
    }

    #[test]
    fn clients_are_independent() {
        let limiter = RateLimiterRegistry::new();
        for i in 0..CAPACITY {
            limiter.is_allowed("A");
            if i == 2 {
                assert!(limiter.is_allowed("B"));
            }
        }
        assert!(!limiter.is_allowed("A"));
        assert!(limiter.is_allowed("B"));
        assert_eq!(limiter.available_tokens("B"), CAPACITY - 2);
    }

    #[test]
    fn keys_are_case_sensitive_and_opaque() {
        let limiter = RateLimiterRegistry::new();
        for _ in 0..CAPACITY {
            limiter.is_allowed("::ffff:10.0.0.1");
        }
        assert!(!limiter.is_allowed("::ffff:10.0.0.1"));
        assert!(limiter.is_allowed("::FFFF:10.0.0.1"));
        assert!(limiter.is_allowed(""));
    }

    #[test]
    fn unknown_key_is_fully_available_and_not_tracked() {
        let limiter = RateLimiterRegistry::new();
        assert_eq!(limiter.available_tokens("192.168.1.5"), CAPACITY);
        assert_eq!(limiter.seconds_to_wait_for_refill("192.168.1.5"), 0);
        assert!(limiter.is_empty());
    }

    #[test]
    fn available_tokens_counts_down() {
        let limiter = RateLimiterRegistry::new();
        limiter.is_allowed("192.168.1.5");
        limiter.is_allowed("192.168.1.5");
        assert_eq!(limiter.available_tokens("192.168.1.5"), 3);
        assert_eq!(limiter.seconds_to_wait_for_refill("192.168.1.5"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_client_waits_full_minute() {
        let limiter = RateLimiterRegistry::new();
        for _ in 0..CAPACITY {
            assert!(limiter.is_allowed("1.1.1.1"));
        }
        assert!(!limiter.is_allowed("1.1.1.1"));
        assert_eq!(limiter.seconds_to_wait_for_refill("1.1.1.1"), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_shrinks_then_bucket_refills() {
        let limiter = RateLimiterRegistry::new();
        for _ in 0..CAPACITY {
            limiter.is_allowed("10.0.0.9");
        }

        tokio::time::advance(Duration::from_secs(20)).await;
        assert!(!limiter.is_allowed("10.0.0.9"));
        assert_eq!(limiter.seconds_to_wait_for_refill("10.0.0.9"), 40);

        tokio::time::advance(Duration::from_secs(40)).await;
        assert_eq!(limiter.available_tokens("10.0.0.9"), CAPACITY);
        assert!(limiter.is_allowed("10.0.0.9"));
        assert_eq!(limiter.seconds_to_wait_for_refill("10.0.0.9"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn eviction_only_drops_refilled_buckets() {
        let limiter = RateLimiterRegistry::new();
        limiter.is_allowed("old");
        tokio::time::advance(Duration::from_secs(30)).await;
        for _ in 0..CAPACITY {
            limiter.is_allowed("young");
        }

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(limiter.evict_refilled(Instant::now()), 1);
        assert_eq!(limiter.len(), 1);
        assert_eq!(limiter.available_tokens("old"), CAPACITY);
        assert!(!limiter.is_allowed("young"));

        tokio::time::advance(REFILL_PERIOD).await;
        assert_eq!(limiter.evict_refilled(Instant::now()), 1);
        assert!(limiter.is_empty());
    }

    #[test]
    fn concurrent_requests_never_overconsume() {
        const EXTRA: usize = 45;
        let threads = CAPACITY as usize + EXTRA;
        let limiter = RateLimiterRegistry::new();
        let barrier = Barrier::new(threads);
        let allowed = AtomicUsize::new(0);
        let denied = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..threads {
                s.spawn(|| {
                    barrier.wait();
                    if limiter.is_allowed("fresh-key") {
                        allowed.fetch_add(1, Ordering::Relaxed);
                    } else {
                        denied.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });

        assert_eq!(allowed.load(Ordering::Relaxed), CAPACITY as usize);
        assert_eq!(denied.load(Ordering::Relaxed), EXTRA);
        assert_eq!(limiter.len(), 1);
    }
}
