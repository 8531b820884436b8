//! `albumdl` entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use albumdl_axum::{Cli, DEFAULT_LOG_FILTER, start_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Cli::parse().into_config();
    start_server(config).await
}
