//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the operations for a specific entity.

pub mod page;
pub mod post;
pub mod verified_user;

pub use page::{NewPage, PageRepository, SqlxPageRepository};
pub use post::{NewPost, PostRepository, SqlxPostRepository};
pub use verified_user::{SqlxVerifiedUserRepository, VerifiedUserRepository};
