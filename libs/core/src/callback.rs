//! Typed callback events.
//!
//! A messaging item is a discriminated union over four event kinds, keyed by
//! which discriminator field is present. Items are parsed only after
//! [`crate::validate::validate_callback`] has accepted the payload, so the
//! fields pulled out here are known to be present and non-empty.

use crate::error::WebhookError;
use serde_json::Value;

/// One messaging event unit within an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackEvent {
    Auth(AuthEvent),
    Message(MessageEvent),
    Delivery(DeliveryEvent),
    Postback(PostbackEvent),
}

/// Opt-in event fired when a user authorizes/opens the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthEvent {
    pub sender_id: String,
    pub recipient_id: String,
    pub timestamp: i64,
    pub pass_through: String,
}

/// A received user message, carrying either text or media attachments.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    pub sender_id: String,
    pub recipient_id: String,
    pub timestamp: i64,
    pub mid: String,
    pub seq: i64,
    pub content: MessageContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(String),
    Attachments(Vec<MediaAttachment>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaAttachment {
    pub kind: MediaKind,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

/// Delivery receipt: every message up to `watermark` has been seen.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryEvent {
    pub sender_id: String,
    pub recipient_id: String,
    pub watermark: i64,
    pub seq: i64,
    pub mids: Vec<String>,
}

/// Structured button-tap event with opaque pass-through payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PostbackEvent {
    pub sender_id: String,
    pub recipient_id: String,
    pub timestamp: i64,
    pub payload: String,
}

/// Page ids arrive as either JSON numbers or strings; normalize to a string.
pub(crate) fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Timestamps and sequence numbers may arrive as numbers or numeric strings.
pub(crate) fn scalar_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or(0),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

impl CallbackEvent {
    /// Parses one validated messaging item, trying the discriminator keys in
    /// fixed priority order: optin, message, delivery, postback. An item is
    /// expected to carry exactly one; if several are present the priority
    /// order decides.
    pub fn from_item(item: &Value) -> Result<Self, WebhookError> {
        let sender_id = scalar_string(&item["sender"]["id"]);
        let recipient_id = scalar_string(&item["recipient"]["id"]);
        let timestamp = item.get("timestamp").map(scalar_i64).unwrap_or(0);

        if let Some(optin) = item.get("optin") {
            Ok(CallbackEvent::Auth(AuthEvent {
                sender_id,
                recipient_id,
                timestamp,
                pass_through: scalar_string(&optin["ref"]),
            }))
        } else if let Some(message) = item.get("message") {
            let content = if let Some(text) = message.get("text").and_then(Value::as_str) {
                MessageContent::Text(text.to_string())
            } else {
                let attachments = message
                    .get("attachments")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().filter_map(parse_attachment).collect())
                    .unwrap_or_default();
                MessageContent::Attachments(attachments)
            };
            Ok(CallbackEvent::Message(MessageEvent {
                sender_id,
                recipient_id,
                timestamp,
                mid: scalar_string(&message["mid"]),
                seq: scalar_i64(&message["seq"]),
                content,
            }))
        } else if let Some(delivery) = item.get("delivery") {
            let mids = delivery
                .get("mids")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(scalar_string).collect())
                .unwrap_or_default();
            Ok(CallbackEvent::Delivery(DeliveryEvent {
                sender_id,
                recipient_id,
                watermark: scalar_i64(&delivery["watermark"]),
                seq: scalar_i64(&delivery["seq"]),
                mids,
            }))
        } else if let Some(postback) = item.get("postback") {
            Ok(CallbackEvent::Postback(PostbackEvent {
                sender_id,
                recipient_id,
                timestamp,
                payload: scalar_string(&postback["payload"]),
            }))
        } else {
            Err(WebhookError::bad_value(
                "$.entry[].messaging[]",
                "must contain one of 'optin', 'message', 'delivery' or 'postback'",
            ))
        }
    }
}

fn parse_attachment(value: &Value) -> Option<MediaAttachment> {
    let kind = match value.get("type").and_then(Value::as_str) {
        Some("image") => MediaKind::Image,
        Some("video") => MediaKind::Video,
        Some("audio") => MediaKind::Audio,
        _ => return None,
    };
    let url = value.get("payload")?.get("url")?.as_str()?.to_string();
    Some(MediaAttachment { kind, url })
}
