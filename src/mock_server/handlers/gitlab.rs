//! GitLab endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::{error_response, unauthorized, PageQuery};
use crate::mock_server::state::{paginate, MockState};
use crate::SpdxLicenseList;

fn decode(id: String) -> String {
    urlencoding::decode(&id)
        .map(|s| s.into_owned())
        .unwrap_or(id)
}

fn project_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "404 Project Not Found")
}

/// GET /projects/{id}
///
/// `id` is a numeric ID or a URL-encoded `namespace/project` path.
pub async fn get_project(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let id = decode(id);
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    match state.find_gitlab_project(&id) {
        Some(project) => (StatusCode::OK, Json(project.clone())).into_response(),
        None => project_not_found(),
    }
}

/// GET /projects/{id}/languages
pub async fn get_project_languages(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let id = decode(id);
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    let Some(project) = state.find_gitlab_project(&id) else {
        return project_not_found();
    };

    let languages = state
        .gitlab_languages
        .get(&project.id)
        .cloned()
        .unwrap_or_default();
    (StatusCode::OK, Json(languages)).into_response()
}

/// GET /projects/{id}/repository/contributors
pub async fn list_contributors(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let id = decode(id);
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    let Some(project) = state.find_gitlab_project(&id) else {
        return project_not_found();
    };

    let all = state
        .gitlab_contributors
        .get(&project.id)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let (items, has_next) = paginate(all, query.page(), query.per_page());
    let next_page = if has_next {
        (query.page() + 1).to_string()
    } else {
        String::new()
    };

    (
        StatusCode::OK,
        [("x-next-page", next_page), ("x-total", all.len().to_string())],
        Json(items),
    )
        .into_response()
}

/// GET /spdx/licenses.json
pub async fn get_spdx_licenses(State(state): State<Arc<RwLock<MockState>>>) -> impl IntoResponse {
    let state = state.read().await;
    Json(SpdxLicenseList::new(state.spdx_licenses.clone()))
}
