//! Tadu crawler: catalog listings, book metadata and chapter runs
//!
//! This crate retrieves listing pages from the Tadu online book store,
//! resolves per-book metadata from each landing page, and walks a bounded
//! run of chapters per book by following the rendered "next chapter" links.

pub mod api;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum TaduError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not fetch {url} after {attempts} attempts")]
    FetchExhausted { url: String, attempts: u32 },

    #[error("Cover image download failed for {url}: {message}")]
    AssetFetchFailed { url: String, message: String },

    #[error("Browser error at {url}: {message}")]
    Browser { url: String, message: String },

    #[error("Content region {selector} never appeared at {url}")]
    ContentNotReady { url: String, selector: String },

    #[error("Chapter {chapter} at {url} failed: {source}")]
    ChapterFailed {
        chapter: usize,
        url: String,
        source: Box<TaduError>,
    },

    #[error("No books found on listing page {page}")]
    NoBooksFound { page: u32 },

    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, TaduError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    ChapterSession, Coordinator, ListingExtractor, MetadataExtractor, RetryingFetcher,
};
pub use output::{BookError, BookRecord, ChapterRecord, CrawlResult};
pub use state::{SessionState, TerminationReason};
