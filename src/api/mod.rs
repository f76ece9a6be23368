//! HTTP service module
//!
//! Exposes the crawler over HTTP:
//! - `GET /` - Usage message
//! - `GET /crawl?page=<n>&num_chapters=<n>` - Crawl one listing page

use crate::config::Config;
use crate::crawler::Coordinator;
use crate::TaduError;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

mod error_response;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Create the router with all route definitions
pub fn create_router(coordinator: Coordinator, config: Arc<Config>) -> Router {
    let state = AppState::new(coordinator, config);

    Router::new()
        .route("/", get(routes::index))
        .route("/crawl", get(routes::crawl))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP service on the configured host and port
///
/// Runs until the server stops.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tadu_crawler::config::Config;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// tadu_crawler::api::serve(Arc::new(Config::default())).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: Arc<Config>) -> Result<(), TaduError> {
    let coordinator = Coordinator::new(Arc::clone(&config))?;
    let app = create_router(coordinator, Arc::clone(&config));

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_address).await?;

    tracing::info!(address = %bind_address, "HTTP service listening");

    axum::serve(listener, app).await?;

    tracing::info!("HTTP service stopped");
    Ok(())
}
