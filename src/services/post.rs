//! Post service

use std::sync::Arc;

use thiserror::Error;

use crate::db::repositories::{NewPost, PostRepository};
use crate::models::{CreatePostInput, Post};

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error("Missing required fields")]
    MissingFields,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Append a post to a page. Slug and content are required; the image is
    /// optional and saved as-is.
    pub async fn create(&self, input: CreatePostInput) -> Result<Post, PostServiceError> {
        let page_slug = present(&input.slug).ok_or(PostServiceError::MissingFields)?;
        let content = present(&input.content).ok_or(PostServiceError::MissingFields)?;

        let post = self
            .posts
            .create(&NewPost {
                page_slug: page_slug.to_string(),
                content: content.to_string(),
                image_url: present(&input.image_url).map(str::to_string),
            })
            .await
            .map_err(PostServiceError::Internal)?;

        tracing::info!(page_slug = %post.page_slug, "Post saved");
        Ok(post)
    }

    /// Posts for a page, newest first.
    pub async fn list(&self, page_slug: &str) -> Result<Vec<Post>, PostServiceError> {
        self.posts
            .list_for_page(page_slug)
            .await
            .map_err(PostServiceError::Internal)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}
