//! Post repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Post;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Fields persisted on post creation
#[derive(Debug, Clone)]
pub struct NewPost {
    pub page_slug: String,
    pub content: String,
    pub image_url: Option<String>,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &NewPost) -> Result<Post>;
    /// Posts for a page, newest first.
    async fn list_for_page(&self, page_slug: &str) -> Result<Vec<Post>>;
}

pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &NewPost) -> Result<Post> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), post).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), post).await,
        }
    }

    async fn list_for_page(&self, page_slug: &str) -> Result<Vec<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_for_page_sqlite(self.pool.as_sqlite().unwrap(), page_slug).await
            }
            DatabaseDriver::Mysql => {
                list_for_page_mysql(self.pool.as_mysql().unwrap(), page_slug).await
            }
        }
    }
}

// SQLite implementations

async fn create_sqlite(pool: &SqlitePool, post: &NewPost) -> Result<Post> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO posts (page_slug, content, image_url, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&post.page_slug)
    .bind(&post.content)
    .bind(&post.image_url)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    Ok(Post {
        id: result.last_insert_rowid(),
        page_slug: post.page_slug.clone(),
        content: post.content.clone(),
        image_url: post.image_url.clone(),
        created_at: now,
    })
}

async fn list_for_page_sqlite(pool: &SqlitePool, page_slug: &str) -> Result<Vec<Post>> {
    let rows = sqlx::query(
        "SELECT id, page_slug, content, image_url, created_at FROM posts WHERE page_slug = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(page_slug)
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    Ok(rows
        .iter()
        .map(|row| Post {
            id: row.get("id"),
            page_slug: row.get("page_slug"),
            content: row.get("content"),
            image_url: row.get("image_url"),
            created_at: row.get("created_at"),
        })
        .collect())
}

// MySQL implementations

async fn create_mysql(pool: &MySqlPool, post: &NewPost) -> Result<Post> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO posts (page_slug, content, image_url, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&post.page_slug)
    .bind(&post.content)
    .bind(&post.image_url)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    Ok(Post {
        id: result.last_insert_id() as i64,
        page_slug: post.page_slug.clone(),
        content: post.content.clone(),
        image_url: post.image_url.clone(),
        created_at: now,
    })
}

async fn list_for_page_mysql(pool: &MySqlPool, page_slug: &str) -> Result<Vec<Post>> {
    let rows = sqlx::query(
        "SELECT id, page_slug, content, image_url, created_at FROM posts WHERE page_slug = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(page_slug)
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    Ok(rows
        .iter()
        .map(|row| Post {
            id: row.get("id"),
            page_slug: row.get("page_slug"),
            content: row.get("content"),
            image_url: row.get("image_url"),
            created_at: row.get("created_at"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::page::{NewPage, PageRepository, SqlxPageRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::PageCategory;

    async fn setup() -> (DynDatabasePool, SqlxPostRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxPostRepository::new(pool.clone());
        (pool, repo)
    }

    async fn create_parent_page(pool: &DynDatabasePool, slug: &str) {
        let pages = SqlxPageRepository::new(pool.clone());
        pages
            .create(&NewPage {
                slug: slug.to_string(),
                title: "Parent".to_string(),
                content: "body".to_string(),
                content_type: "links".to_string(),
                usage_type: "personal".to_string(),
                category: PageCategory::Family,
                age_verified: false,
                image_url: None,
            })
            .await
            .expect("Failed to create parent page");
    }

    #[tokio::test]
    async fn test_create_post() {
        let (pool, repo) = setup().await;
        create_parent_page(&pool, "parent").await;

        let created = repo
            .create(&NewPost {
                page_slug: "parent".to_string(),
                content: "hello".to_string(),
                image_url: None,
            })
            .await
            .expect("Failed to create post");

        assert!(created.id > 0);
        assert_eq!(created.page_slug, "parent");
        assert_eq!(created.content, "hello");
    }

    #[tokio::test]
    async fn test_create_post_unknown_page_fails() {
        let (_pool, repo) = setup().await;

        // Foreign key constraint: no parent page row
        let result = repo
            .create(&NewPost {
                page_slug: "ghost".to_string(),
                content: "hello".to_string(),
                image_url: None,
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_for_page_newest_first() {
        let (pool, repo) = setup().await;
        create_parent_page(&pool, "parent").await;

        for content in ["one", "two", "three"] {
            repo.create(&NewPost {
                page_slug: "parent".to_string(),
                content: content.to_string(),
                image_url: None,
            })
            .await
            .unwrap();
        }

        let posts = repo.list_for_page("parent").await.expect("List failed");

        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].content, "three");
        assert_eq!(posts[2].content, "one");
    }

    #[tokio::test]
    async fn test_list_for_page_empty() {
        let (pool, repo) = setup().await;
        create_parent_page(&pool, "parent").await;

        let posts = repo.list_for_page("parent").await.expect("List failed");

        assert!(posts.is_empty());
    }
}
