use std::sync::Arc;
use crate::limiter::RateLimiterRegistry;
use crate::quotes::QuoteProvider;

// app's shared state, built once in main
pub struct AppState {
    pub limiter: Arc<RateLimiterRegistry>,
    pub quotes: QuoteProvider,
}

impl AppState {
    pub fn new(limiter: Arc<RateLimiterRegistry>, quotes: QuoteProvider) -> Self {
        Self { limiter, quotes }
    }
}
