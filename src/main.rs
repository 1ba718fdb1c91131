//! Entry point for the daily block server.

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use daily_block::cache::BlockCache;
use daily_block::cli::Cli;
use daily_block::scrapers::wiki::WikiSource;
use daily_block::server;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    // .env values become defaults for the env-backed CLI options
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!(error = %e, "Failed to load .env file; continuing with process environment"),
    }

    let args = Cli::parse();
    let base_path = args.normalized_base_path();
    debug!(?args, %base_path, "Parsed CLI arguments");

    if !args.static_dir.is_dir() {
        warn!(path = %args.static_dir.display(), "Static directory not found; only / and /api will be served");
    }

    let source = WikiSource::new(&args.source_url)?;
    let cache = Arc::new(BlockCache::new(source).with_ttl(args.cache_ttl()));
    info!(
        source = %args.source_url,
        ttl_hours = args.cache_ttl_hours,
        "Block cache initialized"
    );

    let app = server::router(cache, &args.static_dir, &base_path);
    let listener = TcpListener::bind(args.listen_addr()).await?;
    info!(address = %args.listen_addr(), base_path = %base_path, "Listening");

    server::serve(listener, app).await?;

    Ok(())
}
