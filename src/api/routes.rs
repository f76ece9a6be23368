//! Route handlers for the HTTP service

use crate::api::AppState;
use crate::TaduError;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

/// Query parameters for GET /crawl
///
/// Values are kept as raw strings and read as signed integers; anything
/// that does not parse falls back to the default instead of rejecting the
/// request.
#[derive(Debug, Default, Deserialize)]
pub struct CrawlQuery {
    pub page: Option<String>,
    pub num_chapters: Option<String>,
}

impl CrawlQuery {
    /// Listing page to crawl (default: 1)
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a negative page number.
    pub fn page(&self) -> Result<u32, TaduError> {
        let page = parse_or(self.page.as_deref(), 1);
        u32::try_from(page).map_err(|_| TaduError::InvalidParameter {
            name: "page",
            value: page.to_string(),
        })
    }

    /// Chapter budget per book; a negative count means no chapters
    pub fn num_chapters(&self, default: usize) -> usize {
        let default = i64::try_from(default).unwrap_or(i64::MAX);
        let count = parse_or(self.num_chapters.as_deref(), default);
        usize::try_from(count.max(0)).unwrap_or(usize::MAX)
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(default)
}

/// GET / - Usage message
pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Tadu Books API. Use /crawl?page=1&num_chapters=5 to fetch book data."
    }))
}

/// GET /crawl - Crawl one listing page
///
/// Responds 200 with `{ results, errors }` even when some books failed,
/// 404 when the listing page has no books.
pub async fn crawl(State(state): State<AppState>, Query(query): Query<CrawlQuery>) -> Response {
    let page = match query.page() {
        Ok(page) => page,
        Err(e) => return e.into_response(),
    };
    let num_chapters = query.num_chapters(state.config.crawl.default_num_chapters);

    tracing::info!(page, num_chapters, "Crawl requested");

    match state.coordinator.crawl_page(page, num_chapters).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            tracing::error!("Crawl of page {} failed: {}", page, e);
            e.into_response()
        }
    }
}
