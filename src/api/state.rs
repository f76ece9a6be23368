//! Application state for the API server

use crate::config::Config;
use crate::crawler::Coordinator;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request; the coordinator holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Coordinator,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(coordinator: Coordinator, config: Arc<Config>) -> Self {
        Self {
            coordinator,
            config,
        }
    }
}
