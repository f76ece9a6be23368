//! Output module for crawl results
//!
//! This module handles:
//! - The book and chapter records returned to callers
//! - Partitioning a run into successes and per-book errors
//! - Summarising a run for logs and the command line

mod records;
pub mod stats;

pub use records::{BookError, BookRecord, ChapterRecord, CrawlResult};
pub use stats::{log_statistics, print_statistics, CrawlStatistics};
