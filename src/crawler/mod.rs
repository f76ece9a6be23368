//! Crawler module for listing, metadata and chapter extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with bounded retries
//! - Listing page parsing into book identifiers
//! - Landing page parsing into book records
//! - Chapter traversal through a rendering session
//! - Overall crawl coordination

mod chapter;
mod coordinator;
mod fetcher;
mod listing;
mod metadata;
mod renderer;

pub use chapter::{
    parse_chapter_page, ChapterPage, ChapterSession, CONTENT_SELECTOR, PLACEHOLDER_TITLE,
};
pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, AttemptError, RetryPolicy, RetryingFetcher};
pub use listing::ListingExtractor;
pub use metadata::{first_non_empty, MetadataExtractor, Strategy};
pub use renderer::{
    renderer_from_config, BrowserRenderer, PageRenderer, RenderSession, StaticRenderer,
};

use crate::config::Config;
use crate::output::CrawlResult;
use crate::TaduError;
use std::sync::Arc;

/// Runs a complete crawl of one listing page
///
/// This is the main entry point for one-shot crawls. It will:
/// 1. Build the HTTP client and renderer from the configuration
/// 2. List the book identifiers on `page`
/// 3. Extract metadata and up to `num_chapters` chapters per book
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tadu_crawler::config::Config;
/// use tadu_crawler::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let result = crawl(Arc::new(Config::default()), 1, 5).await?;
/// println!("{} books, {} errors", result.books.len(), result.errors.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    config: Arc<Config>,
    page: u32,
    num_chapters: usize,
) -> Result<CrawlResult, TaduError> {
    Coordinator::new(config)?.crawl_page(page, num_chapters).await
}
