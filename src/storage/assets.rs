use chrono::{Datelike, Local, NaiveDate};
use std::path::PathBuf;
use url::Url;

/// Extension used when a cover URL has none, or an implausible one
const DEFAULT_EXTENSION: &str = ".jpg";

/// Longest extension (dot included) accepted from a URL
const MAX_EXTENSION_LEN: usize = 5;

/// Date-partitioned store for cover images
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory for assets saved on `date`: `<root>/<year>/<month>`
    pub fn dir_for(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
    }

    /// Path a cover for book `id` fetched from `url` is saved to on `date`
    pub fn cover_path(&self, id: &str, url: &str, date: NaiveDate) -> PathBuf {
        self.dir_for(date)
            .join(format!("{}{}", id, cover_extension(url)))
    }

    /// Writes cover bytes into this month's directory
    ///
    /// Creates the directory if needed and returns the written path.
    pub async fn save_cover(&self, id: &str, url: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        self.save_cover_on(id, url, bytes, Local::now().date_naive())
            .await
    }

    /// Writes cover bytes into the directory for `date`
    pub async fn save_cover_on(
        &self,
        id: &str,
        url: &str,
        bytes: &[u8],
        date: NaiveDate,
    ) -> std::io::Result<PathBuf> {
        let dir = self.dir_for(date);
        tokio::fs::create_dir_all(&dir).await?;

        let path = self.cover_path(id, url, date);
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!("Saved cover for book {} to {}", id, path.display());
        Ok(path)
    }
}

/// Derives a file extension from the final path segment of a cover URL
///
/// Falls back to `.jpg` when the segment has no extension or the extension
/// (dot included) is longer than five characters.
///
/// # Examples
///
/// ```
/// use tadu_crawler::storage::cover_extension;
///
/// assert_eq!(cover_extension("https://media3.tadu.com/a/b.png"), ".png");
/// assert_eq!(cover_extension("https://media3.tadu.com/a/b"), ".jpg");
/// ```
pub fn cover_extension(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };

    let file_name = path.rsplit('/').next().unwrap_or_default();

    // Leading dots belong to the file name, not the extension
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    let extension = file_name[stem_start..]
        .rfind('.')
        .map(|idx| &file_name[stem_start + idx..]);

    match extension {
        Some(ext) if ext.len() > 1 && ext.len() <= MAX_EXTENSION_LEN => ext.to_string(),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}
