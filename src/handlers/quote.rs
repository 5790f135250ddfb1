use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    response::IntoResponse,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::client_key::client_key;
use crate::error::ApiError;
use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_LATENCY, REQUEST_TOTAL, TRACKED_CLIENTS};
use crate::models::QuoteResponse;
use crate::state::AppState;

static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

pub async fn quote_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    let client = client_key(&headers, peer);
    let allowed = state.limiter.is_allowed(&client);
    TRACKED_CLIENTS.set(state.limiter.len() as f64);

    if !allowed {
        RATE_LIMITED_TOTAL.inc();
        let retry_after_secs = state.limiter.seconds_to_wait_for_refill(&client);
        warn!(client = %client, status = 429, "rate limit exceeded");
        return Err(ApiError::RateLimited { retry_after_secs });
    }

    let quote = state.quotes.random_quote();
    let remaining = state.limiter.available_tokens(&client);
    info!(client = %client, status = 200, remaining, "quote served");

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok((
        [(X_RATELIMIT_REMAINING.clone(), HeaderValue::from(remaining))],
        Json(QuoteResponse {
            quote: quote.to_string(),
        }),
    ))
}
