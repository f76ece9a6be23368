//! URL handling module
//!
//! This module resolves the store's relative and protocol-relative links
//! against the configured origin.

mod normalize;

pub use normalize::{normalize_image_url, resolve_next_link};
