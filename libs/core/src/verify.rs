//! Webhook verification handshake.
//!
//! The platform registers a webhook by issuing a GET with `hub.verify_token`
//! and `hub.challenge` query parameters; we check the token against the
//! configured secret and echo the challenge back verbatim.

use crate::config::WebhookConfig;
use crate::error::WebhookError;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Returns the challenge string to echo, or a 400/403-class error.
pub fn verify(query: &VerifyQuery, config: &WebhookConfig) -> Result<String, WebhookError> {
    let token = query
        .verify_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| WebhookError::bad_request("missing verification token"))?;

    if token != config.verify_token {
        return Err(WebhookError::forbidden("verification token mismatch"));
    }

    match query.challenge.as_deref().filter(|c| !c.is_empty()) {
        Some(challenge) => Ok(challenge.to_string()),
        None => Err(WebhookError::bad_request("missing challenge")),
    }
}
