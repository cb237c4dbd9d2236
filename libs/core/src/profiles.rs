//! User profile lookup against the Graph API.
//!
//! Sender ids in callbacks are page-scoped; this resolves one to the user's
//! public profile fields so bots can greet people by name.

use crate::config::WebhookConfig;
use crate::error::WebhookError;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_PROFILE_FIELDS: &str = "first_name,last_name,locale,timezone,gender";

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Public profile fields for a page-scoped user id. Every field is optional;
/// the platform omits whatever was not requested or not shared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub locale: Option<String>,
    // Offset from UTC in hours; can be fractional.
    pub timezone: Option<f64>,
    pub gender: Option<String>,
}

/// Fetches user profiles over the same bounded-timeout HTTP stack as the
/// sender. A `mock://` api base short-circuits to an empty profile.
pub struct ProfileClient {
    http: reqwest::Client,
    api_base: String,
    page_token: String,
}

impl ProfileClient {
    pub fn new(config: &WebhookConfig) -> anyhow::Result<Self> {
        let timeout = std::env::var("SEND_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT);
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            page_token: config.page_token.clone(),
        })
    }

    pub async fn get(&self, user_id: &str) -> Result<UserProfile, WebhookError> {
        self.get_fields(user_id, DEFAULT_PROFILE_FIELDS).await
    }

    pub async fn get_fields(
        &self,
        user_id: &str,
        fields: &str,
    ) -> Result<UserProfile, WebhookError> {
        if self.api_base.starts_with("mock://") {
            return Ok(UserProfile::default());
        }

        // The url carries the page token; log the user id only.
        tracing::debug!(user_id = %user_id, fields = %fields, "fetching user profile");
        let response = self
            .http
            .get(self.profile_url(user_id, fields))
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "profile request failed");
                WebhookError::internal("failed to fetch user profile")
            })?;
        let status = response.status();
        let body_text = response.text().await.map_err(|err| {
            tracing::error!(error = %err, "failed to read profile response");
            WebhookError::internal("failed to fetch user profile")
        })?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %body_text, "remote profile fetch failed");
            return Err(WebhookError::internal("failed to fetch user profile"));
        }

        serde_json::from_str(&body_text).map_err(|err| {
            tracing::error!(error = %err, "failed to parse profile response");
            WebhookError::internal("failed to fetch user profile")
        })
    }

    fn profile_url(&self, user_id: &str, fields: &str) -> String {
        format!(
            "{}/v2.6/{}?fields={}&access_token={}",
            self.api_base.trim_end_matches('/'),
            user_id,
            fields,
            self.page_token
        )
    }
}
