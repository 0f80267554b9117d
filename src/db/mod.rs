//! Database layer
//!
//! Trait-based pool abstraction over SQLite (default) and MySQL, code-based
//! migrations, and repository traits for pages, posts, and verified users.
//! The driver is selected by configuration; repositories dispatch per driver.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use migrations::run_migrations;
pub use pool::{create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase};
