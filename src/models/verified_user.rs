//! Verified user model
//!
//! Presence of a row means the email passed age verification at some point.
//! The record is upserted on success and acts as a durable cache of prior
//! verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedUser {
    pub email: String,
    pub verified_at: DateTime<Utc>,
}
