//! Data models
//!
//! Database entities and API input types for the LivePage service:
//! - Page (slug-keyed page records with category and age-gate state)
//! - Post (content items appended to a page)
//! - VerifiedUser (durable cache of successful age verifications)

mod page;
mod post;
mod verified_user;

pub use page::{CreatePageInput, Page, PageCategory, PageSummary, UpdatePageInput};
pub use post::{CreatePostInput, Post};
pub use verified_user::VerifiedUser;
