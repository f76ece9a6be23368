//! Crawler coordinator - per-request crawl orchestration
//!
//! This module ties the components together for one listing page:
//! - Listing the book identifiers on the page
//! - Extracting each book's metadata
//! - Walking each book's chapters
//! - Partitioning the outcome into books and per-book errors
//!
//! Books are processed strictly one after another, in identifier order.

use crate::config::Config;
use crate::crawler::chapter::ChapterSession;
use crate::crawler::fetcher::{build_http_client, RetryingFetcher};
use crate::crawler::listing::ListingExtractor;
use crate::crawler::metadata::MetadataExtractor;
use crate::crawler::renderer::{renderer_from_config, PageRenderer};
use crate::output::{log_statistics, BookRecord, CrawlResult, CrawlStatistics};
use crate::storage::AssetStore;
use crate::TaduError;
use std::sync::Arc;
use std::time::Instant;

/// Main crawler coordinator structure
#[derive(Clone)]
pub struct Coordinator {
    config: Arc<Config>,
    listing: ListingExtractor,
    metadata: MetadataExtractor,
    chapters: ChapterSession,
}

impl Coordinator {
    /// Creates a coordinator using the renderer selected in the configuration
    pub fn new(config: Arc<Config>) -> Result<Self, TaduError> {
        let fetcher = Self::build_fetcher(&config)?;
        let renderer = renderer_from_config(&config, fetcher.clone());
        Self::assemble(config, fetcher, renderer)
    }

    /// Creates a coordinator with an explicit chapter renderer
    pub fn with_renderer(
        config: Arc<Config>,
        renderer: Arc<dyn PageRenderer>,
    ) -> Result<Self, TaduError> {
        let fetcher = Self::build_fetcher(&config)?;
        Self::assemble(config, fetcher, renderer)
    }

    fn build_fetcher(config: &Config) -> Result<RetryingFetcher, TaduError> {
        let client = build_http_client(&config.http)?;
        Ok(RetryingFetcher::new(client, &config.http))
    }

    fn assemble(
        config: Arc<Config>,
        fetcher: RetryingFetcher,
        renderer: Arc<dyn PageRenderer>,
    ) -> Result<Self, TaduError> {
        let listing = ListingExtractor::new(fetcher.clone(), config.site.clone())?;
        let metadata = MetadataExtractor::new(
            fetcher,
            AssetStore::new(&config.assets.uploads_root),
            config.site.clone(),
        )?;
        let chapters = ChapterSession::new(renderer, &config.site, &config.browser);

        Ok(Self {
            config,
            listing,
            metadata,
            chapters,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Crawls every book on a listing page
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Books and per-book errors, in identifier order
    /// * `Err(TaduError::NoBooksFound)` - The listing page had no books
    /// * `Err(TaduError::FetchExhausted)` - The listing page was unreachable
    pub async fn crawl_page(
        &self,
        page: u32,
        num_chapters: usize,
    ) -> Result<CrawlResult, TaduError> {
        let start_time = Instant::now();

        let ids = self.listing.list_book_ids(page).await?;
        if ids.is_empty() {
            return Err(TaduError::NoBooksFound { page });
        }

        let mut result = CrawlResult::default();

        for (idx, id) in ids.iter().enumerate() {
            tracing::info!("[{}/{}] Processing book {}", idx + 1, ids.len(), id);

            match self.crawl_book(id, num_chapters).await {
                Ok(book) => result.push_book(book),
                Err(e) => {
                    tracing::error!("Error crawling book {}: {}", id, e);
                    result.push_error(id, e);
                }
            }
        }

        let stats = CrawlStatistics::from_result(page, &result, start_time.elapsed());
        log_statistics(&stats);

        Ok(result)
    }

    /// Extracts one book's metadata, then walks its chapters
    pub async fn crawl_book(&self, id: &str, num_chapters: usize) -> Result<BookRecord, TaduError> {
        let mut book = self.metadata.extract_metadata(id).await?;

        let start_url = format!("{}{}", book.source_url, self.config.site.chapter_start_suffix);
        book.chapters = self.chapters.crawl(&start_url, num_chapters).await?;

        Ok(book)
    }
}
