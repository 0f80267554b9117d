//! Business logic

pub mod age;
pub mod moderation;
pub mod page;
pub mod post;
pub mod render;
pub mod slug;

pub use age::{AgeCredential, AgeVerification, AgeVerifier, GoogleAgeVerifier};
pub use moderation::{ContentClassifier, KeywordClassifier, Verdict};
pub use page::{CreatedPage, PageService, PageServiceError};
pub use post::{PostService, PostServiceError};
pub use render::PageRenderer;
