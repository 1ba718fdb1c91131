//! Minecraft wiki block list scraper.
//!
//! Scrapes the block overview page at `{base}/w/Block`. The page lists every
//! block inside a multi-column `div.div-col.columns.column-width` container,
//! one `<li>` per block with a small sprite image and a link.
//!
//! # Image URLs
//!
//! The wiki serves list sprites as thumbnails:
//!
//! ```text
//! /images/thumb/Andesite_JE2_BE2.png/30px-Andesite_JE2_BE2.png?a7c2e
//! ```
//!
//! The full-size image lives at `{base}/images/Andesite_JE2_BE2.png`, so the
//! file name is recovered from the path segment right after `thumb/`. This
//! depends entirely on the wiki's thumbnail convention; when the marker is
//! missing the block gets an empty image instead of a guessed URL.

use crate::errors::BlockError;
use crate::models::Block;
use crate::scrapers::BlockSource;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Default wiki origin.
pub const DEFAULT_BASE_URL: &str = "https://minecraft.wiki";

/// Path of the block overview page, relative to the wiki root.
const BLOCK_PAGE_PATH: &str = "w/Block";

/// Marker preceding the file name in thumbnail URLs.
const THUMB_MARKER: &str = "thumb/";

static CONTAINER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.div-col.columns.column-width").unwrap());
static ITEM_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

/// Block source backed by the wiki's block overview page.
#[derive(Debug, Clone)]
pub struct WikiSource {
    client: Client,
    base_url: Url,
}

impl WikiSource {
    /// Create a source for the wiki rooted at `base_url` (e.g. `https://minecraft.wiki`).
    ///
    /// The page and image URLs are both resolved under `base_url`, so a wiki
    /// mounted below a path (`https://example.com/wiki`) works too.
    pub fn new(base_url: &str) -> Result<Self, BlockError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// Absolute URL of the block overview page.
    pub fn page_url(&self) -> Result<Url, BlockError> {
        Ok(self.base_url.join(BLOCK_PAGE_PATH)?)
    }

    /// Wiki root without a trailing slash, used to build image URLs.
    fn image_base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

impl BlockSource for WikiSource {
    #[instrument(level = "info", skip_all)]
    async fn fetch(&self) -> Result<Vec<Block>, BlockError> {
        let url = self.page_url()?;
        let html = fetch_page(&self.client, &url).await?;
        let blocks = parse_blocks(&html, self.image_base())?;

        info!(
            count = blocks.len(),
            source = %url,
            "Scraped wiki block list"
        );
        Ok(blocks)
    }
}

/// Download a page, turning non-success statuses into [`BlockError::Transport`].
#[instrument(level = "info", skip_all, fields(%url))]
async fn fetch_page(client: &Client, url: &Url) -> Result<String, BlockError> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();

    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("Unknown status");
        warn!(status = status.as_u16(), reason, "Wiki request failed");
        return Err(BlockError::Transport {
            message: format!("HTTP error: {reason}"),
            code: status.as_u16(),
        });
    }

    let body = response.text().await?;
    debug!(bytes = body.len(), "Downloaded wiki page");
    Ok(body)
}

/// Parse the block overview page into blocks, in document order.
///
/// `base` is the wiki origin without a trailing slash.
///
/// # Errors
///
/// - [`BlockError::ContainerNotFound`] if the list container is absent
/// - [`BlockError::ListNotFound`] if the container holds no `<li>` items
pub fn parse_blocks(html: &str, base: &str) -> Result<Vec<Block>, BlockError> {
    let document = Html::parse_document(html);

    let container = document
        .select(&CONTAINER_SELECTOR)
        .next()
        .ok_or(BlockError::ContainerNotFound)?;

    let blocks: Vec<Block> = container
        .select(&ITEM_SELECTOR)
        .map(|item| parse_item(item, base))
        .collect();

    if blocks.is_empty() {
        return Err(BlockError::ListNotFound);
    }

    Ok(blocks)
}

fn parse_item(item: ElementRef<'_>, base: &str) -> Block {
    let name = item.text().collect::<String>().trim().to_string();
    let image = item
        .select(&IMAGE_SELECTOR)
        .next()
        .and_then(|img| img.value().attr("src"))
        .and_then(|src| full_size_image_url(src, base))
        .unwrap_or_default();

    if image.is_empty() {
        debug!(%name, "No image derived for block");
    }

    Block { name, image }
}

/// Rebuild the full-size image URL from a thumbnail `src`.
///
/// `/images/thumb/Stone.png/30px-Stone.png?1` becomes `{base}/images/Stone.png`.
/// Returns `None` when the `thumb/` marker is missing or nothing follows it.
pub fn full_size_image_url(src: &str, base: &str) -> Option<String> {
    let (_, rest) = src.split_once(THUMB_MARKER)?;
    let file = rest.split('/').next().filter(|f| !f.is_empty())?;
    Some(format!("{base}/images/{file}"))
}
