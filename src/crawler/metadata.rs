//! Book landing page parsing
//!
//! Each field is read through an ordered table of [`Strategy`] values; the
//! first strategy producing a non-empty value wins, and a field with no
//! winner is left empty. A missing field never fails the record.

use crate::config::SiteConfig;
use crate::crawler::fetcher::RetryingFetcher;
use crate::output::BookRecord;
use crate::storage::AssetStore;
use crate::url::normalize_image_url;
use crate::TaduError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;

/// Cover URLs the media host serves for books without artwork
const BLANK_COVER_PATTERN: &str = r"^https://media\d+\.tadu\.com//?$";

/// How one field value is read from a landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Trimmed attribute of the first element matching `selector`
    Attr {
        selector: &'static str,
        attr: &'static str,
    },

    /// First non-blank attribute, in `attrs` order, of a single element:
    /// the first match of the earliest selector in `selectors` that matches
    FirstAttr {
        selectors: &'static [&'static str],
        attrs: &'static [&'static str],
    },

    /// Trimmed text nodes of the first match, concatenated
    Text { selector: &'static str },

    /// Trimmed, non-blank text nodes of the first match, one per line
    Lines { selector: &'static str },
}

impl Strategy {
    /// Applies the strategy; None when the element is missing or the value is blank
    pub fn apply(&self, document: &Html) -> Option<String> {
        let value = match *self {
            Self::Attr { selector, attr } => first_match(document, selector)?
                .value()
                .attr(attr)?
                .trim()
                .to_string(),
            Self::FirstAttr { selectors, attrs } => {
                let element = selectors
                    .iter()
                    .find_map(|selector| first_match(document, selector))?;
                attrs
                    .iter()
                    .filter_map(|attr| element.value().attr(attr))
                    .map(str::trim)
                    .find(|value| !value.is_empty())?
                    .to_string()
            }
            Self::Text { selector } => stripped_text(first_match(document, selector)?),
            Self::Lines { selector } => first_match(document, selector)?
                .text()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        };

        Some(value).filter(|v| !v.is_empty())
    }
}

pub const TITLE_STRATEGIES: &[Strategy] = &[Strategy::Attr {
    selector: "a.bkNm[data-name]",
    attr: "data-name",
}];

pub const AUTHOR_STRATEGIES: &[Strategy] = &[Strategy::Text {
    selector: "span.author",
}];

/// The lazy-loaded image if there is one, else the first image; only that
/// element's attributes are read
pub const COVER_STRATEGIES: &[Strategy] = &[Strategy::FirstAttr {
    selectors: &["img[data-src]", "img"],
    attrs: &["data-src", "src"],
}];

/// Tried when the cover is empty or the media host placeholder
pub const COVER_FALLBACK_STRATEGIES: &[Strategy] = &[Strategy::Attr {
    selector: r#"meta[property="og:image"]"#,
    attr: "content",
}];

pub const DESCRIPTION_STRATEGIES: &[Strategy] = &[Strategy::Lines {
    selector: "p.intro",
}];

const GENRE_CONTAINER_SELECTOR: &str = "div.sortList";
const GENRE_ITEM_SELECTOR: &str = "a";

/// First non-empty value produced by `strategies`, in order
pub fn first_non_empty(document: &Html, strategies: &[Strategy]) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy.apply(document))
}

fn first_match<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect::<String>()
}

/// Extracts book records from landing pages
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    fetcher: RetryingFetcher,
    assets: AssetStore,
    site: SiteConfig,
    blank_cover: Regex,
}

impl MetadataExtractor {
    pub fn new(
        fetcher: RetryingFetcher,
        assets: AssetStore,
        site: SiteConfig,
    ) -> Result<Self, TaduError> {
        Ok(Self {
            fetcher,
            assets,
            site,
            blank_cover: Regex::new(BLANK_COVER_PATTERN)?,
        })
    }

    /// Fetches and parses a book's landing page, saving its cover locally
    ///
    /// The returned record has no chapters.
    ///
    /// # Errors
    ///
    /// `FetchExhausted` if the landing page cannot be retrieved. Missing
    /// fields and cover download failures are not errors.
    pub async fn extract_metadata(&self, id: &str) -> Result<BookRecord, TaduError> {
        let url = self.site.book_url(id);
        tracing::info!("Crawling book info: {}", url);

        let body = self.fetcher.fetch(&url).await?;
        let mut record = self.parse_landing_page(id, &url, &body);

        if !record.cover_image_url.is_empty() {
            // Best effort: a failed download leaves the local path empty
            record.cover_image_local_path =
                match self.save_cover(id, &record.cover_image_url).await {
                    Ok(path) => path.to_string_lossy().replace('\\', "/"),
                    Err(e) => {
                        tracing::warn!("Cover download failed for book {}: {}", id, e);
                        String::new()
                    }
                };
        }

        Ok(record)
    }

    /// Parses landing page markup into a record
    pub fn parse_landing_page(&self, id: &str, url: &str, html: &str) -> BookRecord {
        let document = Html::parse_document(html);
        let text = |strategies: &[Strategy]| {
            first_non_empty(&document, strategies).unwrap_or_default()
        };

        let mut record = BookRecord::empty(id, url);
        record.title = text(TITLE_STRATEGIES);
        record.author = text(AUTHOR_STRATEGIES);
        record.cover_image_url = self.resolve_cover_url(&document);
        record.description = text(DESCRIPTION_STRATEGIES);
        record.genres = extract_genres(&document);
        record
    }

    /// Cover URL after normalization and the social-preview fallback
    pub fn resolve_cover_url(&self, document: &Html) -> String {
        let cover = first_non_empty(document, COVER_STRATEGIES)
            .map(|raw| normalize_image_url(&raw, &self.site.origin))
            .unwrap_or_default();

        if cover.is_empty() || self.is_blank_cover(&cover) {
            if let Some(preview) = first_non_empty(document, COVER_FALLBACK_STRATEGIES) {
                return preview;
            }
        }

        cover
    }

    /// Whether `url` is the media host's empty placeholder
    pub fn is_blank_cover(&self, url: &str) -> bool {
        self.blank_cover.is_match(url)
    }

    async fn save_cover(&self, id: &str, url: &str) -> Result<PathBuf, TaduError> {
        let bytes = self.fetcher.fetch_asset(url).await?;

        self.assets
            .save_cover(id, url, &bytes)
            .await
            .map_err(|e| TaduError::AssetFetchFailed {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

/// Texts of every anchor inside the genre container, in document order
fn extract_genres(document: &Html) -> Vec<String> {
    let (Ok(container), Ok(item)) = (
        Selector::parse(GENRE_CONTAINER_SELECTOR),
        Selector::parse(GENRE_ITEM_SELECTOR),
    ) else {
        return Vec::new();
    };

    document
        .select(&container)
        .next()
        .map(|div| div.select(&item).map(stripped_text).collect())
        .unwrap_or_default()
}
