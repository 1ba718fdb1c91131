//! # Daily Block
//!
//! Serves a "block of the day" scraped from the Minecraft wiki's block list,
//! as an HTML page and a JSON endpoint.
//!
//! ## Usage
//!
//! ```sh
//! SERVERPORT=3000 daily_block
//! curl http://localhost:3000/api
//! ```
//!
//! ## Architecture
//!
//! 1. **Scraping**: [`scrapers::wiki`] downloads `/w/Block` and maps the list
//!    markup to [`models::Block`] values
//! 2. **Caching**: [`cache::BlockCache`] keeps the list for 24 hours and only
//!    scrapes again once it goes stale
//! 3. **Selection**: [`selection`] turns today's date into a stable index
//! 4. **Serving**: [`server`] exposes `/`, `/api` and the static directory

pub mod cache;
pub mod cli;
pub mod errors;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod selection;
pub mod server;

pub use cache::{BlockCache, Clock, SystemClock};
pub use errors::BlockError;
pub use models::Block;
pub use scrapers::BlockSource;
