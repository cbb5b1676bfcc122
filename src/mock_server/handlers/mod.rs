//! HTTP request handlers for the mock server.

pub mod github;
pub mod gitlab;

pub use github::*;
pub use gitlab::*;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Deserialize;

/// `page`/`per_page` query parameters shared by both providers.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Both providers default to 20 and cap at 100.
    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }
}

/// JSON error body in the `{"message": ...}` shape both providers use.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "message": message }))).into_response()
}

pub(crate) fn unauthorized() -> Response {
    error_response(StatusCode::UNAUTHORIZED, "Bad credentials")
}
