//! Page API endpoints
//!
//! - POST /createPage - create a page from submitted content
//! - POST /updatePage - replace a page's title and content
//! - GET  /explore    - recent pages, optionally filtered by category

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, AppState};
use crate::models::{CreatePageInput, Page, PageCategory, PageSummary, UpdatePageInput};

/// Verification cookie lifetime: 30 days
const VERIFIED_COOKIE_MAX_AGE: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Serialize)]
pub struct CreatePageResponse {
    pub message: String,
    pub url: String,
    pub page: Page,
}

#[derive(Debug, Serialize)]
pub struct UpdatePageResponse {
    pub message: String,
    pub page: Page,
}

#[derive(Debug, Deserialize)]
pub struct ExploreQuery {
    /// Raw category filter; parsed leniently since a literal `+` in a query
    /// string decodes as a space
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExploreResponse {
    pub pages: Vec<PageSummary>,
}

/// POST /createPage
///
/// On an age-verified submission the response carries a session cookie with
/// the verified email, so repeat submissions can identify the visitor.
pub async fn create_page(
    State(state): State<AppState>,
    Json(input): Json<CreatePageInput>,
) -> Result<Response, ApiError> {
    let created = state.page_service.create(input).await?;

    let cookie = created
        .verified_email
        .as_deref()
        .map(verification_cookie)
        .map(|value| HeaderValue::from_str(&value))
        .transpose()
        .map_err(|_| ApiError::internal_error("Internal server error"))?;

    let body = CreatePageResponse {
        message: "Page created successfully".to_string(),
        url: created.url,
        page: created.page,
    };

    let mut response = Json(body).into_response();
    if let Some(cookie) = cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    Ok(response)
}

/// POST /updatePage
pub async fn update_page(
    State(state): State<AppState>,
    Json(input): Json<UpdatePageInput>,
) -> Result<Json<UpdatePageResponse>, ApiError> {
    let page = state.page_service.update(input).await?;
    Ok(Json(UpdatePageResponse {
        message: "Page updated successfully!".to_string(),
        page,
    }))
}

/// GET /explore?category=
pub async fn explore(
    State(state): State<AppState>,
    Query(query): Query<ExploreQuery>,
) -> Result<Json<ExploreResponse>, ApiError> {
    let pages = match query.category.as_deref() {
        None => state.page_service.explore(None).await?,
        Some(raw) => match parse_category(raw) {
            Some(category) => state.page_service.explore(Some(category)).await?,
            // an unknown category filter matches nothing
            None => Vec::new(),
        },
    };
    Ok(Json(ExploreResponse { pages }))
}

/// Parse a category filter from a query string. Accepts `18+` both encoded
/// (`%2B`) and with a literal `+`, which arrives here as a space.
fn parse_category(raw: &str) -> Option<PageCategory> {
    match raw.trim() {
        "family" => Some(PageCategory::Family),
        "18+" | "18" => Some(PageCategory::Adult),
        _ => None,
    }
}

fn verification_cookie(email: &str) -> String {
    format!(
        "lp_verified={}; HttpOnly; Secure; Max-Age={}; Path=/",
        urlencoding::encode(email),
        VERIFIED_COOKIE_MAX_AGE
    )
}
