//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A content item attached to a page; immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub page_slug: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for appending a post to a page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    pub slug: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}
