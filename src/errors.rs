//! Error types for fetching, parsing, and selecting blocks.
//!
//! Every failure on the block path is a [`BlockError`]. Variants that the HTTP
//! layer knows how to report carry a status code through [`BlockError::code`];
//! everything else (network failures without a response, malformed source URL)
//! returns `None` and is reported as a generic internal error.

/// Errors raised while producing today's block.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// The wiki answered with a non-success status.
    #[error("{message}")]
    Transport {
        /// Human-readable description, e.g. `"HTTP error: Service Unavailable"`.
        message: String,
        /// The upstream HTTP status code.
        code: u16,
    },

    /// The block list container is missing from the page.
    #[error("Parser error: can't find container")]
    ContainerNotFound,

    /// The container holds no list items.
    #[error("Parser error: can't find list element")]
    ListNotFound,

    /// There are no blocks to select from.
    #[error("Selection error: block list is empty")]
    EmptySource,

    /// The request never produced a response (DNS, connection, body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured source URL could not be parsed or joined.
    #[error("Invalid source URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BlockError {
    /// The HTTP status this error should be reported with, if it is a
    /// classified error.
    ///
    /// Markup and selection failures are internal assumptions being violated,
    /// so they always map to 500 regardless of what the upstream returned.
    pub fn code(&self) -> Option<u16> {
        match self {
            BlockError::Transport { code, .. } => Some(*code),
            BlockError::ContainerNotFound | BlockError::ListNotFound | BlockError::EmptySource => {
                Some(500)
            }
            BlockError::Network(_) | BlockError::InvalidUrl(_) => None,
        }
    }
}
