//! Page model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content rating category driving moderation and age-gating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageCategory {
    #[serde(rename = "family")]
    Family,
    #[serde(rename = "18+")]
    Adult,
}

impl std::fmt::Display for PageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Family => write!(f, "family"),
            Self::Adult => write!(f, "18+"),
        }
    }
}

impl std::str::FromStr for PageCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "family" => Ok(Self::Family),
            "18+" => Ok(Self::Adult),
            _ => Err(anyhow::anyhow!("Invalid page category: {}", s)),
        }
    }
}

/// A published page, keyed by its URL slug
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub content_type: String,
    pub usage_type: String,
    pub category: PageCategory,
    pub age_verified: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trimmed page record for the explore listing (no body content)
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub title: String,
    pub slug: String,
    pub category: PageCategory,
    pub content_type: String,
    pub usage_type: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a page
///
/// All fields arrive optional from the wire; the page service decides which
/// are required. Empty strings are treated as missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageInput {
    pub title: Option<String>,
    pub content_type: Option<String>,
    pub usage_type: Option<String>,
    pub content: Option<String>,
    pub category: Option<PageCategory>,
    pub image_url: Option<String>,
    pub google_token: Option<String>,
    pub google_code: Option<String>,
    pub redirect_uri: Option<String>,
}

/// Input for updating a page
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePageInput {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}
