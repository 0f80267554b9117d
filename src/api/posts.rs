//! Post API endpoints
//!
//! - POST /savePost - append a post to a page
//! - GET  /getPosts - list a page's posts, newest first

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::{ApiError, AppState};
use crate::models::{CreatePostInput, Post};

#[derive(Debug, Deserialize)]
pub struct GetPostsQuery {
    pub slug: Option<String>,
}

/// POST /savePost
pub async fn save_post(
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> Result<&'static str, ApiError> {
    state.post_service.create(input).await?;
    Ok("OK")
}

/// GET /getPosts?slug=
pub async fn get_posts(
    State(state): State<AppState>,
    Query(query): Query<GetPostsQuery>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let slug = query
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .ok_or_else(|| ApiError::validation_error("Missing slug"))?;

    let posts = state.post_service.list(slug).await?;
    Ok(Json(posts))
}
