use serde::{Deserialize, Serialize};

/// One chapter collected by a chapter session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub title: String,

    /// Non-empty paragraph texts of the content region, newline-joined
    pub content: String,

    #[serde(rename = "url")]
    pub source_url: String,
}

/// Metadata and chapters of one book
///
/// `id` is always populated; every other string field is empty when the
/// landing page did not carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub author: String,

    #[serde(rename = "cover_image")]
    pub cover_image_url: String,

    /// Where the cover was saved, with forward slashes; empty if not saved
    #[serde(rename = "cover_image_local")]
    pub cover_image_local_path: String,

    pub description: String,
    pub genres: Vec<String>,

    #[serde(rename = "url")]
    pub source_url: String,

    #[serde(default)]
    pub chapters: Vec<ChapterRecord>,
}

impl BookRecord {
    /// A record with only the key fields set
    pub fn empty(id: &str, source_url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: String::new(),
            author: String::new(),
            cover_image_url: String::new(),
            cover_image_local_path: String::new(),
            description: String::new(),
            genres: Vec::new(),
            source_url: source_url.to_string(),
            chapters: Vec::new(),
        }
    }
}

/// A book that could not be crawled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookError {
    pub id: String,
    pub error: String,
}

/// Outcome of crawling one listing page
///
/// Both sequences keep the order in which identifiers were processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    #[serde(rename = "results")]
    pub books: Vec<BookRecord>,
    pub errors: Vec<BookError>,
}

impl CrawlResult {
    pub fn push_book(&mut self, book: BookRecord) {
        self.books.push(book);
    }

    pub fn push_error(&mut self, id: &str, error: impl ToString) {
        self.errors.push(BookError {
            id: id.to_string(),
            error: error.to_string(),
        });
    }

    /// Total number of identifiers processed
    pub fn processed(&self) -> usize {
        self.books.len() + self.errors.len()
    }
}
