//! Database migrations
//!
//! Code-based migrations embedded as SQL strings, supporting both SQLite and
//! MySQL for single-binary deployment. Each migration carries a version, a
//! name, and the SQL for each backend; applied versions are recorded in a
//! `_migrations` tracking table.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};

use super::DynDatabasePool;
use crate::config::DatabaseDriver;

/// A database migration with SQL for both SQLite and MySQL
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements for SQLite
    pub up_sqlite: &'static str,
    /// SQL statements for MySQL
    pub up_mysql: &'static str,
}

/// Migration record stored in the database
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// All migrations for the LivePage service.
pub const MIGRATIONS: &[Migration] = &[
    // Migration 1: pages table (slug is the public identifier)
    Migration {
        version: 1,
        name: "create_pages",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS pages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug VARCHAR(255) NOT NULL UNIQUE,
                title VARCHAR(255) NOT NULL,
                content TEXT NOT NULL,
                content_type VARCHAR(50) NOT NULL,
                usage_type VARCHAR(50) NOT NULL,
                category VARCHAR(20) NOT NULL,
                age_verified BOOLEAN NOT NULL DEFAULT 0,
                image_url TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_pages_slug ON pages(slug);
            CREATE INDEX IF NOT EXISTS idx_pages_category ON pages(category);
            CREATE INDEX IF NOT EXISTS idx_pages_created_at ON pages(created_at);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS pages (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                slug VARCHAR(255) NOT NULL UNIQUE,
                title VARCHAR(255) NOT NULL,
                content TEXT NOT NULL,
                content_type VARCHAR(50) NOT NULL,
                usage_type VARCHAR(50) NOT NULL,
                category VARCHAR(20) NOT NULL,
                age_verified BOOLEAN NOT NULL DEFAULT 0,
                image_url TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX idx_pages_category ON pages(category);
            CREATE INDEX idx_pages_created_at ON pages(created_at);
        "#,
    },
    // Migration 2: posts table, many posts per page
    Migration {
        version: 2,
        name: "create_posts",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                page_slug VARCHAR(255) NOT NULL,
                content TEXT NOT NULL,
                image_url TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (page_slug) REFERENCES pages(slug)
            );
            CREATE INDEX IF NOT EXISTS idx_posts_page_slug ON posts(page_slug);
            CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS posts (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                page_slug VARCHAR(255) NOT NULL,
                content TEXT NOT NULL,
                image_url TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (page_slug) REFERENCES pages(slug)
            );
            CREATE INDEX idx_posts_page_slug ON posts(page_slug);
            CREATE INDEX idx_posts_created_at ON posts(created_at);
        "#,
    },
    // Migration 3: verified_users, durable cache of successful age checks
    Migration {
        version: 3,
        name: "create_verified_users",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS verified_users (
                email VARCHAR(255) PRIMARY KEY,
                verified_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS verified_users (
                email VARCHAR(255) PRIMARY KEY,
                verified_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
];

/// Run all pending migrations, returning the number applied.
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_migrations(pool).await?;
    let applied_versions: Vec<i32> = applied.iter().map(|m| m.version as i32).collect();

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Mysql => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

async fn get_applied_migrations(pool: &DynDatabasePool) -> Result<Vec<MigrationRecord>> {
    let rows = match pool.driver() {
        DatabaseDriver::Sqlite => {
            fetch_applied_sqlite(pool.as_sqlite().expect("sqlite pool")).await?
        }
        DatabaseDriver::Mysql => fetch_applied_mysql(pool.as_mysql().expect("mysql pool")).await?,
    };
    Ok(rows)
}

async fn fetch_applied_sqlite(pool: &SqlitePool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        })
        .collect())
}

async fn fetch_applied_mysql(pool: &MySqlPool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| MigrationRecord {
            version: row.get::<i32, _>("version") as i64,
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        })
        .collect())
}

async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    match pool.driver() {
        DatabaseDriver::Sqlite => {
            let sqlite = pool.as_sqlite().expect("sqlite pool");
            for statement in split_sql_statements(migration.up_sqlite) {
                sqlx::query(statement)
                    .execute(sqlite)
                    .await
                    .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
            }
            sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
                .bind(migration.version)
                .bind(migration.name)
                .execute(sqlite)
                .await?;
        }
        DatabaseDriver::Mysql => {
            let mysql = pool.as_mysql().expect("mysql pool");
            for statement in split_sql_statements(migration.up_mysql) {
                sqlx::query(statement)
                    .execute(mysql)
                    .await
                    .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
            }
            sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
                .bind(migration.version)
                .bind(migration.name)
                .execute(mysql)
                .await?;
        }
    }

    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    if sql.len() > 100 {
        format!("{}...", &sql[..100])
    } else {
        sql.to_string()
    }
}

/// Split a migration body into individual statements.
fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[test]
    fn test_migrations_are_ordered_and_unique() {
        let mut versions: Vec<i32> = MIGRATIONS.iter().map(|m| m.version).collect();
        let original = versions.clone();
        versions.sort_unstable();
        versions.dedup();
        assert_eq!(versions, original, "versions must be sorted and unique");
    }

    #[test]
    fn test_split_sql_statements() {
        let sql = "CREATE TABLE a (id INTEGER);\nCREATE INDEX i ON a(id);\n";
        let statements = split_sql_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("CREATE TABLE"));
        assert!(statements[1].starts_with("CREATE INDEX"));
    }

    #[tokio::test]
    async fn test_run_migrations_applies_all() {
        let pool = create_test_pool().await.expect("Failed to create pool");
        let applied = run_migrations(&pool).await.expect("Migrations failed");
        assert_eq!(applied, MIGRATIONS.len());

        // Tables exist
        pool.execute("SELECT count(*) FROM pages").await.unwrap();
        pool.execute("SELECT count(*) FROM posts").await.unwrap();
        pool.execute("SELECT count(*) FROM verified_users").await.unwrap();
    }

    #[tokio::test]
    async fn test_run_migrations_is_idempotent() {
        let pool = create_test_pool().await.expect("Failed to create pool");
        let first = run_migrations(&pool).await.expect("Migrations failed");
        let second = run_migrations(&pool).await.expect("Migrations failed");
        assert_eq!(first, MIGRATIONS.len());
        assert_eq!(second, 0);
    }
}
