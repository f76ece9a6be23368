//! HTTP error response handling for the API
//!
//! Converts crawler errors into status codes with a JSON `{ "error": ... }`
//! body.

use crate::TaduError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl TaduError {
    /// HTTP status a failed crawl request is answered with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoBooksFound { .. } => StatusCode::NOT_FOUND,
            Self::FetchExhausted { .. } => StatusCode::BAD_GATEWAY,
            Self::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TaduError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
