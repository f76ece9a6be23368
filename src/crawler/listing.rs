//! Listing page parsing
//!
//! Turns a catalog page into the set of book identifiers it links to.

use crate::config::SiteConfig;
use crate::crawler::fetcher::RetryingFetcher;
use crate::TaduError;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// Anchors wrapping a book cover on a listing page
const BOOK_LINK_SELECTOR: &str = "a.bookImg[href]";

/// Identifier embedded in a book link path
const BOOK_ID_PATTERN: &str = r"/book/(\d+)/";

/// Extracts book identifiers from listing pages
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    fetcher: RetryingFetcher,
    site: SiteConfig,
    link_selector: Selector,
    id_pattern: Regex,
}

impl ListingExtractor {
    pub fn new(fetcher: RetryingFetcher, site: SiteConfig) -> Result<Self, TaduError> {
        let link_selector = Selector::parse(BOOK_LINK_SELECTOR)
            .map_err(|e| TaduError::Selector(format!("{}: {}", BOOK_LINK_SELECTOR, e)))?;
        let id_pattern = Regex::new(BOOK_ID_PATTERN)?;

        Ok(Self {
            fetcher,
            site,
            link_selector,
            id_pattern,
        })
    }

    /// Lists the book identifiers on a listing page
    ///
    /// Identifiers are deduplicated and returned in ascending string order,
    /// so `"12"` sorts before `"5"`. An empty list is a valid outcome.
    ///
    /// # Errors
    ///
    /// `FetchExhausted` if the listing page cannot be retrieved.
    pub async fn list_book_ids(&self, page: u32) -> Result<Vec<String>, TaduError> {
        let url = self.site.listing_url(page);
        tracing::info!("Fetching book IDs from listing page {}: {}", page, url);

        let body = self.fetcher.fetch(&url).await?;
        let ids = self.parse_book_ids(&body);

        tracing::info!("Found {} book IDs on page {}", ids.len(), page);
        Ok(ids)
    }

    /// Parses listing markup into sorted, unique identifiers
    pub fn parse_book_ids(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        let ids: BTreeSet<String> = document
            .select(&self.link_selector)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| self.id_pattern.captures(href))
            .filter_map(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .collect();

        ids.into_iter().collect()
    }
}
