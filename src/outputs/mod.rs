//! Response rendering.
//!
//! # Submodules
//!
//! - [`html`]: Renders the block of the day page served at `/`
//!
//! The JSON endpoint serializes [`Block`](crate::models::Block) directly and
//! needs no renderer of its own.

pub mod html;
