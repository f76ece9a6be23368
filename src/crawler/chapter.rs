//! Chapter traversal
//!
//! A [`ChapterSession`] walks a book's chapters by following each page's
//! next-chapter link, inside one rendering session per book. The walk is
//! the [`SessionState`] machine:
//!
//! ```text
//! Navigating(url) -> Extracting -> Navigating(next_url)
//!                              \-> Terminated
//! ```

use crate::config::{BrowserConfig, SiteConfig};
use crate::crawler::renderer::{PageRenderer, RenderSession};
use crate::output::ChapterRecord;
use crate::state::SessionState;
use crate::url::resolve_next_link;
use crate::TaduError;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;

/// Region holding the chapter text; its presence marks the page as ready
pub const CONTENT_SELECTOR: &str = "#partContent";

const HEADING_SELECTOR: &str = "h4";
const PARAGRAPH_SELECTOR: &str = "p";
const NEXT_LINK_SELECTOR: &str = "a#paging_right";

/// Title used when a chapter page has no heading
pub const PLACEHOLDER_TITLE: &str = "No Title";

/// What one rendered chapter page yields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterPage {
    pub title: String,
    pub content: String,
    pub next_url: Option<String>,
}

/// Parses a rendered chapter page
///
/// # Extraction Rules
///
/// - Title: the second `h4` when there are at least two (the first is
///   site chrome), else the only one, else [`PLACEHOLDER_TITLE`]
/// - Content: trimmed, non-empty paragraphs of the content region,
///   newline-joined in document order
/// - Next link: href of the next-chapter anchor, resolved against `origin`
pub fn parse_chapter_page(html: &str, origin: &str) -> ChapterPage {
    let document = Html::parse_document(html);

    ChapterPage {
        title: extract_title(&document),
        content: extract_content(&document),
        next_url: extract_next_url(&document, origin),
    }
}

fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse(HEADING_SELECTOR) else {
        return PLACEHOLDER_TITLE.to_string();
    };

    let headings: Vec<_> = document.select(&selector).take(2).collect();

    headings
        .get(1)
        .or_else(|| headings.first())
        .map(|heading| heading.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string())
}

fn extract_content(document: &Html) -> String {
    let (Ok(region), Ok(paragraph)) = (
        Selector::parse(CONTENT_SELECTOR),
        Selector::parse(PARAGRAPH_SELECTOR),
    ) else {
        return String::new();
    };

    let Some(region) = document.select(&region).next() else {
        return String::new();
    };

    region
        .select(&paragraph)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_next_url(document: &Html, origin: &str) -> Option<String> {
    let selector = Selector::parse(NEXT_LINK_SELECTOR).ok()?;
    let href = document.select(&selector).next()?.value().attr("href")?;
    resolve_next_link(href, origin)
}

/// Drives chapter runs for single books
#[derive(Clone)]
pub struct ChapterSession {
    renderer: Arc<dyn PageRenderer>,
    origin: String,
    politeness_delay: Duration,
}

impl ChapterSession {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        site: &SiteConfig,
        browser: &BrowserConfig,
    ) -> Self {
        Self {
            renderer,
            origin: site.origin.clone(),
            politeness_delay: browser.politeness_delay(),
        }
    }

    /// Collects up to `budget` chapters starting at `start_url`
    ///
    /// Returns fewer than `budget` chapters only when a page had no next
    /// link. One rendering session is opened for the run and closed
    /// afterwards, whether the run succeeded or not. A budget of zero
    /// returns immediately without opening a session.
    ///
    /// # Errors
    ///
    /// `ChapterFailed` wrapping the navigation or readiness error of the
    /// chapter that could not be loaded.
    pub async fn crawl(
        &self,
        start_url: &str,
        budget: usize,
    ) -> Result<Vec<ChapterRecord>, TaduError> {
        let state = SessionState::start(start_url, budget);
        if state.is_terminal() {
            return Ok(Vec::new());
        }

        let mut session = self.renderer.open_session().await?;
        let result = self.run(session.as_mut(), state, budget).await;

        if let Err(e) = session.close().await {
            tracing::warn!("Failed to close chapter session: {}", e);
        }

        result
    }

    async fn run(
        &self,
        session: &mut dyn RenderSession,
        mut state: SessionState,
        budget: usize,
    ) -> Result<Vec<ChapterRecord>, TaduError> {
        let mut chapters = Vec::new();

        loop {
            state = match state {
                SessionState::Navigating { url } => {
                    let chapter = chapters.len() + 1;
                    tracing::info!("Crawling chapter {}: {}", chapter, url);

                    let html = session
                        .render(&url, CONTENT_SELECTOR)
                        .await
                        .map_err(|e| TaduError::ChapterFailed {
                            chapter,
                            url: url.clone(),
                            source: Box::new(e),
                        })?;

                    SessionState::Extracting { url, html }
                }

                SessionState::Extracting { url, html } => {
                    let page = parse_chapter_page(&html, &self.origin);
                    chapters.push(ChapterRecord {
                        title: page.title,
                        content: page.content,
                        source_url: url,
                    });

                    let next =
                        SessionState::after_extraction(chapters.len(), budget, page.next_url);
                    if !next.is_terminal() && !self.politeness_delay.is_zero() {
                        tokio::time::sleep(self.politeness_delay).await;
                    }
                    next
                }

                SessionState::Terminated(reason) => {
                    tracing::info!(
                        "Chapter run ended after {} chapters: {}",
                        chapters.len(),
                        reason
                    );
                    return Ok(chapters);
                }
            };
        }
    }
}
