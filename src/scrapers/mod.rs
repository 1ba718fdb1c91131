//! Block sources.
//!
//! A [`BlockSource`] produces the full, ordered list of blocks in one call.
//! The cache owns when a source is called; sources never cache on their own.
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Minecraft wiki | [`wiki`] | HTML scraping | `/w/Block` block list, thumbnail URLs rewritten to full size |

use crate::errors::BlockError;
use crate::models::Block;
use std::future::Future;

pub mod wiki;

/// Something that can produce the current list of blocks.
///
/// The returned future must be `Send` so handlers driving the cache can run on
/// the multi-threaded runtime.
pub trait BlockSource: Send + Sync {
    /// Fetch and parse the complete block list, in source order.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Block>, BlockError>> + Send;
}
