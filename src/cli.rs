//! Command-line interface definitions for the daily block server.
//!
//! Every option can also be set through an environment variable; a `.env`
//! file in the working directory is loaded before parsing, so values are read
//! once at startup.

use chrono::TimeDelta;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Command-line arguments for the daily block server.
///
/// # Examples
///
/// ```sh
/// # Defaults: port 3000, no prefix, ./public for static files
/// daily_block
///
/// # Mounted under /minecraft behind a reverse proxy
/// SERVERPORT=8080 BASE_PATH=/minecraft daily_block
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "SERVERPORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: IpAddr,

    /// Path prefix every route is mounted under (e.g. /minecraft)
    #[arg(short, long, env = "BASE_PATH")]
    pub base_path: Option<String>,

    /// Directory of static files served alongside the page
    #[arg(short, long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Root URL of the wiki; `w/Block` and `images/` are resolved under it
    #[arg(long, env = "BLOCK_SOURCE_URL", default_value = "https://minecraft.wiki")]
    pub source_url: String,

    /// Hours a scraped block list stays fresh
    #[arg(long, env = "CACHE_TTL_HOURS", default_value_t = 24)]
    pub cache_ttl_hours: u32,
}

impl Cli {
    /// The base path in mountable form: empty, or `/segment[/segment...]`
    /// without a trailing slash.
    pub fn normalized_base_path(&self) -> String {
        normalize_base_path(self.base_path.as_deref().unwrap_or_default())
    }

    /// The freshness window for the block cache.
    pub fn cache_ttl(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.cache_ttl_hours))
    }

    /// Socket address to bind the listener on.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

/// Normalise a user-supplied prefix: trims whitespace and slashes, then adds a
/// single leading slash. `""` and `"/"` mean no prefix.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
