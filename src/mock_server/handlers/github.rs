//! GitHub endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::LINK, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::{error_response, unauthorized, PageQuery};
use crate::mock_server::state::{paginate, MockState};

fn repo_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// GET /repos/{owner}/{repo}
pub async fn get_repository(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    match state.get_github_repository(&format!("{owner}/{repo}")) {
        Some(repository) => (StatusCode::OK, Json(repository.clone())).into_response(),
        None => repo_not_found(),
    }
}

/// GET /repos/{owner}/{repo}/languages
pub async fn get_languages(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    let full_path = format!("{owner}/{repo}");
    if state.get_github_repository(&full_path).is_none() {
        return repo_not_found();
    }

    let languages = state.github_languages.get(&full_path).cloned().unwrap_or_default();
    (StatusCode::OK, Json(languages)).into_response()
}

/// GET /repos/{owner}/{repo}/readme
pub async fn get_readme(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    match state.github_readmes.get(&format!("{owner}/{repo}")) {
        Some(readme) => (StatusCode::OK, Json(readme.clone())).into_response(),
        None => repo_not_found(),
    }
}

/// GET /repos/{owner}/{repo}/commits
pub async fn list_commits(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    let full_path = format!("{owner}/{repo}");
    if state.get_github_repository(&full_path).is_none() {
        return repo_not_found();
    }

    match state.github_commits.get(&full_path) {
        Some(commits) => {
            let (items, has_next) = paginate(commits, query.page(), query.per_page());
            let mut response = (StatusCode::OK, Json(items)).into_response();
            if has_next {
                let link = format!(
                    r#"</repos/{full_path}/commits?page={}&per_page={}>; rel="next""#,
                    query.page() + 1,
                    query.per_page()
                );
                if let Ok(value) = HeaderValue::from_str(&link) {
                    response.headers_mut().insert(LINK, value);
                }
            }
            response
        }
        None => error_response(StatusCode::CONFLICT, "Git Repository is empty."),
    }
}
