mod client_key;
mod config;
mod error;
mod handlers;
mod limiter;
mod metrics;
mod models;
mod quotes;
mod rate_limit;
mod state;

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Args;
use crate::limiter::{RateLimiterRegistry, idle_sweeper};
use crate::quotes::QuoteProvider;
use crate::rate_limit::{CAPACITY, REFILL_PERIOD};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // parse cli arguments
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    // creating shared state
    let limiter = Arc::new(RateLimiterRegistry::new());
    let quotes = QuoteProvider::default();
    let state = Arc::new(AppState::new(Arc::clone(&limiter), quotes));

    // spawn the background sweeper, only if asked for
    if args.sweep_interval > 0 {
        let sweep_interval = Duration::from_secs(args.sweep_interval);
        tokio::spawn(idle_sweeper(Arc::clone(&limiter), sweep_interval));
    }

    let app = handlers::router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        "Quote API running on http://{} ({} quotes loaded)",
        addr,
        quotes.quote_count()
    );
    info!(
        "Rate limit: {} requests per {} seconds per client",
        CAPACITY,
        REFILL_PERIOD.as_secs()
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("Quote API stopped");
    Ok(())
}

// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
