//! HTML page views
//!
//! - GET /getPage?slug= - legacy lookup by query parameter
//! - GET /l/{slug}      - canonical page URL
//!
//! These endpoints speak HTML, not the JSON error envelope.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::api::AppState;
use crate::services::slug::normalize_slug;

#[derive(Debug, Deserialize)]
pub struct GetPageQuery {
    pub slug: Option<String>,
}

/// GET /getPage?slug=
pub async fn get_page(
    State(state): State<AppState>,
    Query(query): Query<GetPageQuery>,
) -> Response {
    let slug = match query.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => normalize_slug(slug),
        None => {
            return (StatusCode::BAD_REQUEST, Html("<h1>Missing slug</h1>")).into_response();
        }
    };

    render_page(&state, &slug).await
}

/// GET /l/{slug}
pub async fn page_by_slug(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    render_page(&state, &normalize_slug(&slug)).await
}

async fn render_page(state: &AppState, slug: &str) -> Response {
    let page = match state.page_service.get(slug).await {
        Ok(Some(page)) => page,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, Html("<h1>Page not found</h1>")).into_response();
        }
        Err(err) => {
            tracing::error!(slug, error = format!("{err}").as_str(), "Page lookup failed");
            return server_error();
        }
    };

    let posts = match state.post_service.list(slug).await {
        Ok(posts) => posts,
        Err(err) => {
            tracing::error!(slug, error = format!("{err}").as_str(), "Post lookup failed");
            return server_error();
        }
    };

    match state.renderer.render(&page, &posts) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!(slug, error = format!("{err:#}").as_str(), "Render failed");
            server_error()
        }
    }
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<h1>Something went wrong</h1>"),
    )
        .into_response()
}
