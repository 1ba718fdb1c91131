//! Data model for scraped blocks.
//!
//! A [`Block`] is one entry of the wiki's block list: its display name and the
//! full-size image URL reconstructed from the list thumbnail. Blocks are plain
//! values with structural equality; the list they come from is not
//! deduplicated, so two equal blocks may appear in the same list.

use serde::{Deserialize, Serialize};

/// A single block scraped from the wiki's block list.
///
/// Serialized as-is for the `/api` endpoint:
///
/// ```json
/// { "name": "Andesite", "image": "https://minecraft.wiki/images/Andesite_JE2_BE2.png" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Block {
    /// The trimmed text content of the list item. Expected non-empty, not enforced.
    pub name: String,
    /// Absolute URL of the full-size image, or an empty string when it could
    /// not be derived from the list markup.
    pub image: String,
}

impl Block {
    /// Whether an image URL could be derived for this block.
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}
