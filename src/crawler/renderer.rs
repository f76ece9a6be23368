//! Page renderers for chapter sessions
//!
//! Chapter pages fill their content region from script, so chapter
//! sessions load them through a [`PageRenderer`]. A renderer opens one
//! [`RenderSession`] per book; the session is reused for every chapter of
//! that book and closed when the run ends.
//!
//! - [`BrowserRenderer`] drives headless Chrome and executes page scripts.
//! - [`StaticRenderer`] fetches served markup over plain HTTP.

use crate::config::{BrowserConfig, Config, RendererKind};
use crate::crawler::fetcher::RetryingFetcher;
use crate::TaduError;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use scraper::{Html, Selector};
use std::ffi::{OsStr, OsString};
use std::sync::Arc;
use std::time::Duration;

/// Opens rendering sessions
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, TaduError>;
}

/// One browsing session, used for a single book's chapters
#[async_trait]
pub trait RenderSession: Send {
    /// Navigates to `url`, blocks until `ready_selector` is present, and
    /// returns the rendered document markup
    async fn render(&mut self, url: &str, ready_selector: &str) -> Result<String, TaduError>;

    /// Releases the session; rendering after close is an error
    async fn close(&mut self) -> Result<(), TaduError>;
}

/// Builds the renderer selected in the configuration
pub fn renderer_from_config(config: &Config, fetcher: RetryingFetcher) -> Arc<dyn PageRenderer> {
    match config.browser.renderer {
        RendererKind::Browser => Arc::new(BrowserRenderer::new(
            config.browser.clone(),
            config.http.user_agent.clone(),
        )),
        RendererKind::Static => Arc::new(StaticRenderer::new(fetcher)),
    }
}

fn browser_error(url: &str, e: impl std::fmt::Display) -> TaduError {
    TaduError::Browser {
        url: url.to_string(),
        message: e.to_string(),
    }
}

fn task_error(e: tokio::task::JoinError) -> TaduError {
    TaduError::Task(e.to_string())
}

/// Headless Chrome renderer
///
/// Every session launches its own browser process with a single tab, so
/// nothing is shared between books.
#[derive(Debug, Clone)]
pub struct BrowserRenderer {
    config: BrowserConfig,
    user_agent: String,
}

impl BrowserRenderer {
    pub fn new(config: BrowserConfig, user_agent: String) -> Self {
        Self { config, user_agent }
    }
}

#[async_trait]
impl PageRenderer for BrowserRenderer {
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, TaduError> {
        let config = self.config.clone();
        let user_agent = self.user_agent.clone();

        let session = tokio::task::spawn_blocking(move || -> Result<BrowserSession, TaduError> {
            let browser = launch_browser(&config)?;
            let tab = browser
                .new_tab()
                .map_err(|e| browser_error("about:blank", e))?;

            tab.set_default_timeout(config.navigation_timeout());
            tab.set_user_agent(&user_agent, None, None)
                .map_err(|e| browser_error("about:blank", e))?;

            Ok(BrowserSession {
                browser: Some(browser),
                tab,
            })
        })
        .await
        .map_err(task_error)??;

        tracing::debug!("Browser session opened");
        Ok(Box::new(session))
    }
}

/// Launches Chrome with the configured flags
fn launch_browser(config: &BrowserConfig) -> Result<Browser, TaduError> {
    let flags: Vec<OsString> = config.chrome_flags.iter().map(OsString::from).collect();
    let args: Vec<&OsStr> = flags.iter().map(|flag| flag.as_os_str()).collect();

    // The browser must outlive the longest readiness wait
    let idle_timeout = config.navigation_timeout() + Duration::from_secs(30);

    let options = LaunchOptions::default_builder()
        .headless(config.headless)
        .args(args)
        .idle_browser_timeout(idle_timeout)
        .build()
        .map_err(|e| browser_error("about:blank", e))?;

    Browser::new(options).map_err(|e| browser_error("about:blank", e))
}

struct BrowserSession {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

#[async_trait]
impl RenderSession for BrowserSession {
    async fn render(&mut self, url: &str, ready_selector: &str) -> Result<String, TaduError> {
        if self.browser.is_none() {
            return Err(browser_error(url, "session already closed"));
        }

        let tab = Arc::clone(&self.tab);
        let url = url.to_string();
        let selector = ready_selector.to_string();

        tokio::task::spawn_blocking(move || -> Result<String, TaduError> {
            tab.navigate_to(&url).map_err(|e| browser_error(&url, e))?;
            tab.wait_until_navigated()
                .map_err(|e| browser_error(&url, e))?;

            tab.wait_for_element(&selector)
                .map_err(|_| TaduError::ContentNotReady {
                    url: url.clone(),
                    selector: selector.clone(),
                })?;

            tab.get_content().map_err(|e| browser_error(&url, e))
        })
        .await
        .map_err(task_error)?
    }

    async fn close(&mut self) -> Result<(), TaduError> {
        if let Some(browser) = self.browser.take() {
            // Dropping the browser kills the Chrome process
            tokio::task::spawn_blocking(move || drop(browser))
                .await
                .map_err(task_error)?;
            tracing::debug!("Browser session closed");
        }
        Ok(())
    }
}

/// Plain HTTP renderer
///
/// Serves markup exactly as the store returns it; the readiness selector
/// must already be present in that markup.
#[derive(Debug, Clone)]
pub struct StaticRenderer {
    fetcher: RetryingFetcher,
}

impl StaticRenderer {
    pub fn new(fetcher: RetryingFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, TaduError> {
        Ok(Box::new(StaticSession {
            fetcher: self.fetcher.clone(),
            open: true,
        }))
    }
}

struct StaticSession {
    fetcher: RetryingFetcher,
    open: bool,
}

#[async_trait]
impl RenderSession for StaticSession {
    async fn render(&mut self, url: &str, ready_selector: &str) -> Result<String, TaduError> {
        if !self.open {
            return Err(browser_error(url, "session already closed"));
        }

        let body = self.fetcher.fetch(url).await?;

        if !contains_selector(&body, ready_selector)? {
            return Err(TaduError::ContentNotReady {
                url: url.to_string(),
                selector: ready_selector.to_string(),
            });
        }

        Ok(body)
    }

    async fn close(&mut self) -> Result<(), TaduError> {
        self.open = false;
        Ok(())
    }
}

fn contains_selector(html: &str, selector: &str) -> Result<bool, TaduError> {
    let parsed = Selector::parse(selector)
        .map_err(|e| TaduError::Selector(format!("{}: {}", selector, e)))?;
    Ok(Html::parse_document(html).select(&parsed).next().is_some())
}
