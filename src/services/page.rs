//! Page service
//!
//! Owns the page lifecycle: validation, the 18+ age gate, content moderation,
//! slug selection, and persistence. Policy flags decide which of those steps
//! run, so one service covers every deployment shape.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{AgeGateMode, PagesConfig};
use crate::db::repositories::{NewPage, PageRepository, VerifiedUserRepository};
use crate::models::{CreatePageInput, Page, PageCategory, PageSummary, UpdatePageInput};
use crate::services::age::{AgeCredential, AgeVerifier};
use crate::services::moderation::{ContentClassifier, Verdict};
use crate::services::slug::{derive_slug, random_slug};

/// Title stored when the caller supplied none
const DEFAULT_TITLE: &str = "Untitled Page";

/// Cap on explore listings
const EXPLORE_LIMIT: i64 = 50;

#[derive(Debug, Error)]
pub enum PageServiceError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Age verification required for 18+ content")]
    AgeVerificationRequired,
    #[error("{0}")]
    ContentRejected(String),
    #[error("Page not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Result of a successful page creation
#[derive(Debug)]
pub struct CreatedPage {
    /// Public path of the new page
    pub url: String,
    pub page: Page,
    /// Email confirmed during age verification, for the session cookie
    pub verified_email: Option<String>,
}

pub struct PageService {
    pages: Arc<dyn PageRepository>,
    verified_users: Arc<dyn VerifiedUserRepository>,
    classifier: Arc<dyn ContentClassifier>,
    age_verifier: Arc<dyn AgeVerifier>,
    policy: PagesConfig,
}

impl PageService {
    pub fn new(
        pages: Arc<dyn PageRepository>,
        verified_users: Arc<dyn VerifiedUserRepository>,
        classifier: Arc<dyn ContentClassifier>,
        age_verifier: Arc<dyn AgeVerifier>,
        policy: PagesConfig,
    ) -> Self {
        Self {
            pages,
            verified_users,
            classifier,
            age_verifier,
            policy,
        }
    }

    /// Create a page. Ordering matters: validation, then the age gate, then
    /// moderation, then the insert. A failed gate must leave no trace in the
    /// store.
    pub async fn create(&self, input: CreatePageInput) -> Result<CreatedPage, PageServiceError> {
        let content_type = present(&input.content_type).ok_or(PageServiceError::MissingFields)?;
        let usage_type = present(&input.usage_type).ok_or(PageServiceError::MissingFields)?;
        let content = present(&input.content).ok_or(PageServiceError::MissingFields)?;
        let category = input.category.ok_or(PageServiceError::MissingFields)?;

        let title = present(&input.title);
        if self.policy.require_title && title.is_none() {
            return Err(PageServiceError::MissingFields);
        }

        let mut verified_email = None;
        if category == PageCategory::Adult {
            let credential = self.credential_from(&input)?;
            let verification = self
                .age_verifier
                .verify(&credential)
                .await
                .map_err(PageServiceError::Internal)?;
            if !verification.eligible {
                return Err(PageServiceError::AgeVerificationRequired);
            }
            if let Some(email) = &verification.email {
                self.verified_users
                    .upsert(email)
                    .await
                    .map_err(PageServiceError::Internal)?;
            }
            verified_email = verification.email;
        }

        if self.policy.moderation {
            if let Some(title) = title {
                self.check(self.classifier.classify_text(title, category))?;
            }
            self.check(self.classifier.classify_text(content, category))?;
            if let Some(image_url) = present(&input.image_url) {
                self.check(self.classifier.classify_image(image_url, category))?;
            }
        }

        let slug = match title {
            Some(title) => {
                let derived = derive_slug(title);
                if derived.is_empty() {
                    random_slug()
                } else {
                    derived
                }
            }
            None => random_slug(),
        };

        let page = self
            .pages
            .create(&NewPage {
                slug,
                title: title.unwrap_or(DEFAULT_TITLE).to_string(),
                content: content.to_string(),
                content_type: content_type.to_string(),
                usage_type: usage_type.to_string(),
                category,
                age_verified: category == PageCategory::Adult,
                image_url: present(&input.image_url).map(str::to_string),
            })
            .await
            .map_err(PageServiceError::Internal)?;

        tracing::info!(slug = %page.slug, category = %page.category, "Page created");

        Ok(CreatedPage {
            url: format!("/l/{}", page.slug),
            page,
            verified_email,
        })
    }

    /// Replace a page's title and content.
    pub async fn update(&self, input: UpdatePageInput) -> Result<Page, PageServiceError> {
        let slug = present(&input.slug).ok_or(PageServiceError::MissingFields)?;
        let title = present(&input.title).ok_or(PageServiceError::MissingFields)?;
        let content = present(&input.content).ok_or(PageServiceError::MissingFields)?;

        let updated = self
            .pages
            .update_content(slug, title, content)
            .await
            .map_err(PageServiceError::Internal)?;

        updated.ok_or(PageServiceError::NotFound)
    }

    pub async fn get(&self, slug: &str) -> Result<Option<Page>, PageServiceError> {
        self.pages
            .get_by_slug(slug)
            .await
            .map_err(PageServiceError::Internal)
    }

    /// Most recent pages for the explore listing.
    pub async fn explore(
        &self,
        category: Option<PageCategory>,
    ) -> Result<Vec<PageSummary>, PageServiceError> {
        self.pages
            .list_recent(category, EXPLORE_LIMIT)
            .await
            .map_err(PageServiceError::Internal)
    }

    /// Build the credential matching the configured gate mode. A credential of
    /// the wrong kind counts as missing.
    fn credential_from(&self, input: &CreatePageInput) -> Result<AgeCredential, PageServiceError> {
        match self.policy.age_gate {
            AgeGateMode::Token => present(&input.google_token)
                .map(|token| AgeCredential::Token(token.to_string()))
                .ok_or(PageServiceError::AgeVerificationRequired),
            AgeGateMode::Code => {
                let code = present(&input.google_code)
                    .ok_or(PageServiceError::AgeVerificationRequired)?;
                let redirect_uri = present(&input.redirect_uri)
                    .ok_or(PageServiceError::AgeVerificationRequired)?;
                Ok(AgeCredential::Code {
                    code: code.to_string(),
                    redirect_uri: redirect_uri.to_string(),
                })
            }
            AgeGateMode::Disabled => Err(PageServiceError::AgeVerificationRequired),
        }
    }

    fn check(&self, verdict: Verdict) -> Result<(), PageServiceError> {
        match verdict {
            Verdict::Allowed => Ok(()),
            Verdict::Rejected(reason) => Err(PageServiceError::ContentRejected(reason)),
        }
    }
}

/// Treat empty and whitespace-only strings as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}
