//! Verified user repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::VerifiedUser;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait VerifiedUserRepository: Send + Sync {
    /// Insert or refresh the verification record for an email.
    async fn upsert(&self, email: &str) -> Result<VerifiedUser>;
    async fn is_verified(&self, email: &str) -> Result<bool>;
}

pub struct SqlxVerifiedUserRepository {
    pool: DynDatabasePool,
}

impl SqlxVerifiedUserRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn VerifiedUserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl VerifiedUserRepository for SqlxVerifiedUserRepository {
    async fn upsert(&self, email: &str) -> Result<VerifiedUser> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => upsert_sqlite(self.pool.as_sqlite().unwrap(), email).await,
            DatabaseDriver::Mysql => upsert_mysql(self.pool.as_mysql().unwrap(), email).await,
        }
    }

    async fn is_verified(&self, email: &str) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                is_verified_sqlite(self.pool.as_sqlite().unwrap(), email).await
            }
            DatabaseDriver::Mysql => is_verified_mysql(self.pool.as_mysql().unwrap(), email).await,
        }
    }
}

async fn upsert_sqlite(pool: &SqlitePool, email: &str) -> Result<VerifiedUser> {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO verified_users (email, verified_at) VALUES (?, ?) \
         ON CONFLICT(email) DO UPDATE SET verified_at = excluded.verified_at",
    )
    .bind(email)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to upsert verified user")?;

    Ok(VerifiedUser {
        email: email.to_string(),
        verified_at: now,
    })
}

async fn upsert_mysql(pool: &MySqlPool, email: &str) -> Result<VerifiedUser> {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO verified_users (email, verified_at) VALUES (?, ?) \
         ON DUPLICATE KEY UPDATE verified_at = VALUES(verified_at)",
    )
    .bind(email)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to upsert verified user")?;

    Ok(VerifiedUser {
        email: email.to_string(),
        verified_at: now,
    })
}

async fn is_verified_sqlite(pool: &SqlitePool, email: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM verified_users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("count") > 0)
}

async fn is_verified_mysql(pool: &MySqlPool, email: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM verified_users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("count") > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxVerifiedUserRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxVerifiedUserRepository::new(pool)
    }

    #[tokio::test]
    async fn test_upsert_and_lookup() {
        let repo = setup().await;

        assert!(!repo.is_verified("a@example.com").await.unwrap());

        let record = repo.upsert("a@example.com").await.expect("Upsert failed");
        assert_eq!(record.email, "a@example.com");

        assert!(repo.is_verified("a@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_refreshes_existing_row() {
        let repo = setup().await;

        let first = repo.upsert("b@example.com").await.unwrap();
        let second = repo.upsert("b@example.com").await.unwrap();

        assert!(second.verified_at >= first.verified_at);
        assert!(repo.is_verified("b@example.com").await.unwrap());
    }
}
