use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure for the crawler
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the values the Tadu store is crawled with in production.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub browser: BrowserConfig,
    pub crawl: CrawlConfig,
    pub assets: AssetsConfig,
    pub server: ServerConfig,
}

/// Store endpoints and URL templates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Scheme and host every relative link is resolved against
    pub origin: String,

    /// Listing page URL; `{page}` is replaced with the page number
    pub listing_url_template: String,

    /// Appended to a book's landing URL to reach its first chapter
    pub chapter_start_suffix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.tadu.com".to_string(),
            listing_url_template: "https://www.tadu.com/store/98-a-0-15-a-20-p-{page}-909"
                .to_string(),
            chapter_start_suffix: "1/?isfirstpart=true".to_string(),
        }
    }
}

impl SiteConfig {
    /// Builds the listing URL for a page number
    pub fn listing_url(&self, page: u32) -> String {
        self.listing_url_template.replace("{page}", &page.to_string())
    }

    /// Builds the landing page URL of a book
    pub fn book_url(&self, id: &str) -> String {
        format!("{}/book/{}/", self.origin.trim_end_matches('/'), id)
    }
}

/// HTTP client and retry policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Timeout for page fetches (seconds)
    pub fetch_timeout_secs: u64,

    /// Timeout for the single cover-image download (seconds)
    pub image_timeout_secs: u64,

    /// Number of attempts before a fetch is considered exhausted
    pub max_attempts: u32,

    /// Fixed wait between attempts (seconds)
    pub backoff_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; TaduIDBot/1.0)".to_string(),
            fetch_timeout_secs: 60,
            image_timeout_secs: 30,
            max_attempts: 3,
            backoff_secs: 2,
        }
    }
}

impl HttpConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }
}

/// Which renderer drives chapter sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Headless Chrome, executes the chapter page scripts
    Browser,
    /// Plain HTTP fetch of the served markup
    Static,
}

/// Scripted browser session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserConfig {
    pub renderer: RendererKind,

    /// Run Chrome without a window
    pub headless: bool,

    /// Navigation and readiness-wait timeout (seconds)
    pub navigation_timeout_secs: u64,

    /// Pause between two chapter navigations (milliseconds)
    pub politeness_delay_ms: u64,

    /// Additional Chrome flags
    pub chrome_flags: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            renderer: RendererKind::Browser,
            headless: true,
            navigation_timeout_secs: 60,
            politeness_delay_ms: 1000,
            chrome_flags: vec![],
        }
    }
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}

/// Crawl request defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Chapter budget used when a request does not name one
    pub default_num_chapters: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            default_num_chapters: 5,
        }
    }
}

/// Cover image storage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AssetsConfig {
    /// Root of the `<year>/<month>/` upload tree
    pub uploads_root: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            uploads_root: "../wp-content/uploads".to_string(),
        }
    }
}

/// HTTP service binding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}
