//! Statistics for a single crawl run

use crate::output::CrawlResult;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Listing page the run was started for
    pub page: u32,

    /// Books crawled successfully
    pub books: usize,

    /// Books recorded as errors
    pub errors: usize,

    /// Chapters collected across all books
    pub chapters: usize,

    /// Books whose cover was saved locally
    pub covers_saved: usize,

    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Computes statistics from a finished run
    pub fn from_result(page: u32, result: &CrawlResult, elapsed: Duration) -> Self {
        Self {
            page,
            books: result.books.len(),
            errors: result.errors.len(),
            chapters: result.books.iter().map(|b| b.chapters.len()).sum(),
            covers_saved: result
                .books
                .iter()
                .filter(|b| !b.cover_image_local_path.is_empty())
                .count(),
            elapsed,
        }
    }

    /// Share of processed books that succeeded, in percent
    pub fn success_rate(&self) -> f64 {
        let total = self.books + self.errors;
        if total > 0 {
            (self.books as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Emits the statistics as a single log line
pub fn log_statistics(stats: &CrawlStatistics) {
    tracing::info!(
        "Page {} done: {} books, {} errors, {} chapters, {} covers saved in {:?}",
        stats.page,
        stats.books,
        stats.errors,
        stats.chapters,
        stats.covers_saved,
        stats.elapsed
    );
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is reserved for the JSON result in one-shot mode.
pub fn print_statistics(stats: &CrawlStatistics) {
    eprintln!("=== Crawl Statistics (page {}) ===\n", stats.page);
    eprintln!("  Books crawled: {}", stats.books);
    eprintln!("  Books failed: {}", stats.errors);
    eprintln!("  Chapters collected: {}", stats.chapters);
    eprintln!("  Covers saved: {}", stats.covers_saved);
    eprintln!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    eprintln!(
        "\nSuccess Rate: {:.1}% ({} / {} books)",
        stats.success_rate(),
        stats.books,
        stats.books + stats.errors
    );
}
