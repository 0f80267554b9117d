//! Page repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Page, PageCategory, PageSummary};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Fields persisted on page creation; id and timestamps are assigned here.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub content_type: String,
    pub usage_type: String,
    pub category: PageCategory,
    pub age_verified: bool,
    pub image_url: Option<String>,
}

#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn create(&self, page: &NewPage) -> Result<Page>;
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Page>>;
    /// Update title/content of the row matched by slug, refreshing its
    /// timestamp. Returns None when no row matched.
    async fn update_content(&self, slug: &str, title: &str, content: &str)
        -> Result<Option<Page>>;
    /// Most recent pages, optionally filtered by category, capped at `limit`.
    async fn list_recent(&self, category: Option<PageCategory>, limit: i64)
        -> Result<Vec<PageSummary>>;
}

pub struct SqlxPageRepository {
    pool: DynDatabasePool,
}

impl SqlxPageRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PageRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PageRepository for SqlxPageRepository {
    async fn create(&self, page: &NewPage) -> Result<Page> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), page).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), page).await,
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Page>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_slug_sqlite(self.pool.as_sqlite().unwrap(), slug).await,
            DatabaseDriver::Mysql => get_by_slug_mysql(self.pool.as_mysql().unwrap(), slug).await,
        }
    }

    async fn update_content(
        &self,
        slug: &str,
        title: &str,
        content: &str,
    ) -> Result<Option<Page>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_content_sqlite(self.pool.as_sqlite().unwrap(), slug, title, content).await
            }
            DatabaseDriver::Mysql => {
                update_content_mysql(self.pool.as_mysql().unwrap(), slug, title, content).await
            }
        }
    }

    async fn list_recent(
        &self,
        category: Option<PageCategory>,
        limit: i64,
    ) -> Result<Vec<PageSummary>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_recent_sqlite(self.pool.as_sqlite().unwrap(), category, limit).await
            }
            DatabaseDriver::Mysql => {
                list_recent_mysql(self.pool.as_mysql().unwrap(), category, limit).await
            }
        }
    }
}

const PAGE_COLUMNS: &str = "id, slug, title, content, content_type, usage_type, category, age_verified, image_url, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "title, slug, category, content_type, usage_type, image_url, created_at";

// SQLite implementations

async fn create_sqlite(pool: &SqlitePool, page: &NewPage) -> Result<Page> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO pages (slug, title, content, content_type, usage_type, category, age_verified, image_url, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(&page.slug)
    .bind(&page.title)
    .bind(&page.content)
    .bind(&page.content_type)
    .bind(&page.usage_type)
    .bind(page.category.to_string())
    .bind(page.age_verified)
    .bind(&page.image_url)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create page")?;

    Ok(materialize(page, result.last_insert_rowid(), now))
}

async fn get_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<Page>> {
    let row = sqlx::query(&format!("SELECT {} FROM pages WHERE slug = ?", PAGE_COLUMNS))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to get page")?;
    row.map(|r| row_to_page_sqlite(&r)).transpose()
}

async fn update_content_sqlite(
    pool: &SqlitePool,
    slug: &str,
    title: &str,
    content: &str,
) -> Result<Option<Page>> {
    let now = Utc::now();
    let result = sqlx::query("UPDATE pages SET title = ?, content = ?, updated_at = ? WHERE slug = ?")
        .bind(title)
        .bind(content)
        .bind(now)
        .bind(slug)
        .execute(pool)
        .await
        .context("Failed to update page")?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_by_slug_sqlite(pool, slug).await
}

async fn list_recent_sqlite(
    pool: &SqlitePool,
    category: Option<PageCategory>,
    limit: i64,
) -> Result<Vec<PageSummary>> {
    let rows = match category {
        Some(category) => {
            sqlx::query(&format!(
                "SELECT {} FROM pages WHERE category = ? ORDER BY created_at DESC, id DESC LIMIT ?",
                SUMMARY_COLUMNS
            ))
            .bind(category.to_string())
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query(&format!(
                "SELECT {} FROM pages ORDER BY created_at DESC, id DESC LIMIT ?",
                SUMMARY_COLUMNS
            ))
            .bind(limit)
            .fetch_all(pool)
            .await
        }
    }
    .context("Failed to list pages")?;

    rows.iter().map(row_to_summary_sqlite).collect()
}

// MySQL implementations

async fn create_mysql(pool: &MySqlPool, page: &NewPage) -> Result<Page> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO pages (slug, title, content, content_type, usage_type, category, age_verified, image_url, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(&page.slug)
    .bind(&page.title)
    .bind(&page.content)
    .bind(&page.content_type)
    .bind(&page.usage_type)
    .bind(page.category.to_string())
    .bind(page.age_verified)
    .bind(&page.image_url)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create page")?;

    Ok(materialize(page, result.last_insert_id() as i64, now))
}

async fn get_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<Page>> {
    let row = sqlx::query(&format!("SELECT {} FROM pages WHERE slug = ?", PAGE_COLUMNS))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to get page")?;
    row.map(|r| row_to_page_mysql(&r)).transpose()
}

async fn update_content_mysql(
    pool: &MySqlPool,
    slug: &str,
    title: &str,
    content: &str,
) -> Result<Option<Page>> {
    let now = Utc::now();
    let result = sqlx::query("UPDATE pages SET title = ?, content = ?, updated_at = ? WHERE slug = ?")
        .bind(title)
        .bind(content)
        .bind(now)
        .bind(slug)
        .execute(pool)
        .await
        .context("Failed to update page")?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_by_slug_mysql(pool, slug).await
}

async fn list_recent_mysql(
    pool: &MySqlPool,
    category: Option<PageCategory>,
    limit: i64,
) -> Result<Vec<PageSummary>> {
    let rows = match category {
        Some(category) => {
            sqlx::query(&format!(
                "SELECT {} FROM pages WHERE category = ? ORDER BY created_at DESC, id DESC LIMIT ?",
                SUMMARY_COLUMNS
            ))
            .bind(category.to_string())
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query(&format!(
                "SELECT {} FROM pages ORDER BY created_at DESC, id DESC LIMIT ?",
                SUMMARY_COLUMNS
            ))
            .bind(limit)
            .fetch_all(pool)
            .await
        }
    }
    .context("Failed to list pages")?;

    rows.iter().map(row_to_summary_mysql).collect()
}

// Row mapping

fn materialize(page: &NewPage, id: i64, now: chrono::DateTime<Utc>) -> Page {
    Page {
        id,
        slug: page.slug.clone(),
        title: page.title.clone(),
        content: page.content.clone(),
        content_type: page.content_type.clone(),
        usage_type: page.usage_type.clone(),
        category: page.category,
        age_verified: page.age_verified,
        image_url: page.image_url.clone(),
        created_at: now,
        updated_at: now,
    }
}

fn row_to_page_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Page> {
    let category: String = row.get("category");
    Ok(Page {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        content: row.get("content"),
        content_type: row.get("content_type"),
        usage_type: row.get("usage_type"),
        category: category.parse()?,
        age_verified: row.get("age_verified"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_page_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Page> {
    let category: String = row.get("category");
    Ok(Page {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        content: row.get("content"),
        content_type: row.get("content_type"),
        usage_type: row.get("usage_type"),
        category: category.parse()?,
        age_verified: row.get("age_verified"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_summary_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<PageSummary> {
    let category: String = row.get("category");
    Ok(PageSummary {
        title: row.get("title"),
        slug: row.get("slug"),
        category: category.parse()?,
        content_type: row.get("content_type"),
        usage_type: row.get("usage_type"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
    })
}

fn row_to_summary_mysql(row: &sqlx::mysql::MySqlRow) -> Result<PageSummary> {
    let category: String = row.get("category");
    Ok(PageSummary {
        title: row.get("title"),
        slug: row.get("slug"),
        category: category.parse()?,
        content_type: row.get("content_type"),
        usage_type: row.get("usage_type"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (DynDatabasePool, SqlxPageRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxPageRepository::new(pool.clone());
        (pool, repo)
    }

    fn new_page(slug: &str, category: PageCategory) -> NewPage {
        NewPage {
            slug: slug.to_string(),
            title: format!("Title for {}", slug),
            content: "Some content".to_string(),
            content_type: "links".to_string(),
            usage_type: "personal".to_string(),
            category,
            age_verified: category == PageCategory::Adult,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_page() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create(&new_page("my-page", PageCategory::Family))
            .await
            .expect("Failed to create page");

        assert!(created.id > 0);
        assert_eq!(created.slug, "my-page");
        assert_eq!(created.category, PageCategory::Family);
        assert!(!created.age_verified);
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_fails() {
        let (_pool, repo) = setup_test_repo().await;

        repo.create(&new_page("dup", PageCategory::Family))
            .await
            .expect("First insert should succeed");
        let result = repo.create(&new_page("dup", PageCategory::Family)).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let (_pool, repo) = setup_test_repo().await;

        repo.create(&new_page("findable", PageCategory::Adult))
            .await
            .expect("Failed to create page");

        let found = repo
            .get_by_slug("findable")
            .await
            .expect("Query failed")
            .expect("Page not found");

        assert_eq!(found.slug, "findable");
        assert_eq!(found.category, PageCategory::Adult);
        assert!(found.age_verified);
    }

    #[tokio::test]
    async fn test_get_by_slug_not_found() {
        let (_pool, repo) = setup_test_repo().await;

        let found = repo.get_by_slug("missing").await.expect("Query failed");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_update_content() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create(&new_page("editable", PageCategory::Family))
            .await
            .expect("Failed to create page");

        let updated = repo
            .update_content("editable", "New Title", "New content")
            .await
            .expect("Update failed")
            .expect("Page not found");

        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.content, "New content");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_content_missing_slug_returns_none() {
        let (_pool, repo) = setup_test_repo().await;

        let updated = repo
            .update_content("nope", "T", "C")
            .await
            .expect("Update failed");

        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_list_recent_newest_first_with_filter() {
        let (_pool, repo) = setup_test_repo().await;

        repo.create(&new_page("first", PageCategory::Family)).await.unwrap();
        repo.create(&new_page("second", PageCategory::Adult)).await.unwrap();
        repo.create(&new_page("third", PageCategory::Family)).await.unwrap();

        let all = repo.list_recent(None, 50).await.expect("List failed");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].slug, "third");
        assert_eq!(all[2].slug, "first");

        let family = repo
            .list_recent(Some(PageCategory::Family), 50)
            .await
            .expect("List failed");
        assert_eq!(family.len(), 2);
        assert!(family.iter().all(|p| p.category == PageCategory::Family));
    }

    #[tokio::test]
    async fn test_list_recent_respects_limit() {
        let (_pool, repo) = setup_test_repo().await;

        for i in 0..5 {
            repo.create(&new_page(&format!("page-{}", i), PageCategory::Family))
                .await
                .unwrap();
        }

        let listed = repo.list_recent(None, 2).await.expect("List failed");
        assert_eq!(listed.len(), 2);
    }
}
