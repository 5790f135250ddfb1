use std::time::Duration;
use tokio::time::Instant;

// Every bucket gets the same limit: 5 requests per minute
pub const CAPACITY: u32 = 5;
pub const REFILL_PERIOD: Duration = Duration::from_secs(60);

// Token bucket - tracks requests for one client key.
// Refill is greedy: the whole bucket comes back at once when the period is over.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    tokens: u32,
    window_start: Instant,
}

impl TokenBucket {
    pub fn new(now: Instant) -> Self {
        Self {
            tokens: CAPACITY,
            window_start: now,
        }
    }

    // window expired..? fill it back up
    fn refill(&mut self, now: Instant) {
        if self.is_refilled(now) {
            self.tokens = CAPACITY;
            self.window_start = now;
        }
    }

    /// True once a full refill period has passed since the window started.
    pub fn is_refilled(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.window_start) >= REFILL_PERIOD
    }

    pub fn try_consume(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens == 0 {
            return false;
        }
        self.tokens -= 1;
        true
    }

    pub fn available_tokens(&mut self, now: Instant) -> u32 {
        self.refill(now);
        self.tokens
    }

    /// Whole seconds until the window refills, rounded up. 0 while tokens remain.
    pub fn seconds_until_refill(&mut self, now: Instant) -> u64 {
        self.refill(now);
        if self.tokens > 0 {
            return 0;
        }
        let remaining = (self.window_start + REFILL_PERIOD).saturating_duration_since(now);
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }
}
