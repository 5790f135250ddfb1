use clap::Parser;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "quote-gateway")]
#[command(about = "Random quote API with per-client rate limiting")]
pub struct Args {
    // Address to bind on
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Log filter, RUST_LOG takes precedence when set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    // Seconds between sweeps of refilled buckets (0 = never sweep)
    #[arg(long, default_value_t = 0)]
    pub sweep_interval: u64,
}
