//! Outbound send to the Graph API.

use crate::config::WebhookConfig;
use crate::error::WebhookError;
use crate::validate::validate_message;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Default)]
pub struct SendResult {
    pub recipient_id: Option<String>,
    pub message_id: Option<String>,
    pub raw: Option<Value>,
}

/// Sends assembled outbound messages to the remote messaging API. One bounded
/// POST per send; failures are terminal for the request (no retries).
pub struct MessengerSender {
    http: reqwest::Client,
    api_base: String,
    page_token: String,
}

impl MessengerSender {
    pub fn new(config: &WebhookConfig) -> anyhow::Result<Self> {
        let timeout = std::env::var("SEND_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SEND_TIMEOUT);
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            page_token: config.page_token.clone(),
        })
    }

    /// Validates `message` against the outbound constraints and POSTs it as
    /// JSON. A `mock://` api base returns the payload without network I/O.
    pub async fn send(&self, message: &Value) -> Result<SendResult, WebhookError> {
        validate_message(message)?;

        if self.api_base.starts_with("mock://") {
            return Ok(SendResult {
                recipient_id: None,
                message_id: None,
                raw: Some(json!({ "payload": message })),
            });
        }

        let url = format!(
            "{}/v2.6/me/messages?access_token={}",
            self.api_base.trim_end_matches('/'),
            self.page_token
        );

        let response = self
            .http
            .post(url)
            .json(message)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "send request failed");
                WebhookError::internal("failed to send message")
            })?;
        let status = response.status();
        let body_text = response.text().await.map_err(|err| {
            tracing::error!(error = %err, "failed to read send response");
            WebhookError::internal("failed to send message")
        })?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %body_text, "remote send failed");
            return Err(WebhookError::internal("failed to send message"));
        }

        let raw: Value = serde_json::from_str(&body_text).unwrap_or(Value::Null);
        let recipient_id = raw
            .get("recipient_id")
            .and_then(Value::as_str)
            .map(String::from);
        let message_id = raw
            .get("message_id")
            .and_then(Value::as_str)
            .map(String::from);

        Ok(SendResult {
            recipient_id,
            message_id,
            raw: Some(raw),
        })
    }
}
