//! Age verification
//!
//! Exchanges an OAuth credential for profile data and computes age
//! eligibility. Two entry points exist: the caller may already hold a bearer
//! token, or a one-time authorization code that first needs exchanging at the
//! provider's token endpoint.
//!
//! Provider refusals (non-success responses, missing fields) mean "not
//! verified", not an error; only transport failures propagate as errors.

use crate::config::OAuthConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

/// Minimum age for 18+ content
const MINIMUM_AGE: i64 = 18;

/// Seconds per year under the fixed 365.25-day approximation
const SECONDS_PER_YEAR: f64 = 365.25 * 86_400.0;

/// Credential presented by the caller
#[derive(Debug, Clone)]
pub enum AgeCredential {
    /// Bearer token usable against the profile endpoint directly
    Token(String),
    /// One-time authorization code requiring a token exchange
    Code { code: String, redirect_uri: String },
}

/// Outcome of a verification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeVerification {
    pub eligible: bool,
    /// Verified email, when the provider returned one
    pub email: Option<String>,
}

impl AgeVerification {
    pub fn denied() -> Self {
        Self {
            eligible: false,
            email: None,
        }
    }
}

/// Computes age eligibility from an OAuth credential.
#[async_trait]
pub trait AgeVerifier: Send + Sync {
    async fn verify(&self, credential: &AgeCredential) -> Result<AgeVerification>;
}

/// Age verifier backed by Google's OAuth token endpoint and People API.
pub struct GoogleAgeVerifier {
    client: reqwest::Client,
    config: OAuthConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PersonResponse {
    #[serde(default)]
    birthdays: Vec<Birthday>,
    #[serde(default, rename = "emailAddresses")]
    email_addresses: Vec<EmailAddress>,
}

#[derive(Debug, Deserialize)]
struct Birthday {
    date: Option<BirthDate>,
}

#[derive(Debug, Deserialize)]
struct BirthDate {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct EmailAddress {
    value: Option<String>,
}

impl GoogleAgeVerifier {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Exchange an authorization code for an access token. Returns None when
    /// the provider refuses the code or omits the token.
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<Option<String>> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .client
            .post(&self.config.token_endpoint)
            .form(&params)
            .send()
            .await
            .context("Token exchange request failed")?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Token exchange refused");
            return Ok(None);
        }

        let body: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;

        Ok(body.access_token)
    }

    /// Fetch birthdays and email addresses for the token's owner. Returns
    /// None when the provider refuses the token.
    async fn fetch_profile(&self, access_token: &str) -> Result<Option<PersonResponse>> {
        let url = format!(
            "{}?personFields=birthdays,emailAddresses",
            self.config.profile_endpoint
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .context("Profile request failed")?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Profile fetch refused");
            return Ok(None);
        }

        let body: PersonResponse = response
            .json()
            .await
            .context("Failed to parse profile response")?;

        Ok(Some(body))
    }
}

#[async_trait]
impl AgeVerifier for GoogleAgeVerifier {
    async fn verify(&self, credential: &AgeCredential) -> Result<AgeVerification> {
        let access_token = match credential {
            AgeCredential::Token(token) => token.clone(),
            AgeCredential::Code { code, redirect_uri } => {
                match self.exchange_code(code, redirect_uri).await? {
                    Some(token) => token,
                    None => return Ok(AgeVerification::denied()),
                }
            }
        };

        let profile = match self.fetch_profile(&access_token).await? {
            Some(profile) => profile,
            None => return Ok(AgeVerification::denied()),
        };

        let birth_date = match extract_birth_date(&profile) {
            Some(date) => date,
            None => return Ok(AgeVerification::denied()),
        };

        let email = profile
            .email_addresses
            .into_iter()
            .find_map(|address| address.value);

        let age = age_in_years(birth_date, Utc::now());
        if age >= MINIMUM_AGE {
            Ok(AgeVerification {
                eligible: true,
                email,
            })
        } else {
            tracing::debug!(age, "Age verification denied");
            Ok(AgeVerification::denied())
        }
    }
}

fn extract_birth_date(profile: &PersonResponse) -> Option<NaiveDate> {
    let date = profile.birthdays.first()?.date.as_ref()?;
    NaiveDate::from_ymd_opt(date.year?, date.month?, date.day?)
}

/// Age in whole years using a fixed 365.25-day year.
///
/// Deliberately approximate: within a day or two of an 18th birthday the
/// result can differ from calendar age.
pub fn age_in_years(birth: NaiveDate, now: DateTime<Utc>) -> i64 {
    let birth_instant = Utc.from_utc_datetime(&birth.and_time(NaiveTime::MIN));
    let elapsed = (now - birth_instant).num_seconds();
    (elapsed as f64 / SECONDS_PER_YEAR).floor() as i64
}
