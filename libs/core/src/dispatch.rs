//! Callback validation and dispatch to the bot collaborator.

use crate::callback::{
    scalar_i64, scalar_string, AuthEvent, CallbackEvent, DeliveryEvent, MessageEvent,
    PostbackEvent,
};
use crate::error::WebhookError;
use crate::validate::validate_callback;
use serde_json::Value;

/// The bot/dialog seam. One method per event kind, each receiving the page id
/// and update time from the enclosing entry alongside the typed event.
#[async_trait::async_trait]
pub trait EventHandler: Send + Sync {
    async fn auth_received(
        &self,
        page_id: &str,
        time: i64,
        event: AuthEvent,
    ) -> Result<(), WebhookError>;

    async fn message_received(
        &self,
        page_id: &str,
        time: i64,
        event: MessageEvent,
    ) -> Result<(), WebhookError>;

    async fn message_delivered(
        &self,
        page_id: &str,
        time: i64,
        event: DeliveryEvent,
    ) -> Result<(), WebhookError>;

    async fn postback_received(
        &self,
        page_id: &str,
        time: i64,
        event: PostbackEvent,
    ) -> Result<(), WebhookError>;
}

/// Validates callback data and walks the entry and messaging lists in order,
/// routing every item to the matching handler. Processing is exhaustive: all
/// items in all entries are dispatched, and the first handler error aborts
/// the remainder of the request.
pub async fn dispatch_callback(
    body: &Value,
    handler: &dyn EventHandler,
) -> Result<(), WebhookError> {
    validate_callback(body)?;

    let entries = body["entry"].as_array().map(Vec::as_slice).unwrap_or(&[]);
    for entry in entries {
        let page_id = scalar_string(&entry["id"]);
        let time = scalar_i64(&entry["time"]);
        let items = entry["messaging"].as_array().map(Vec::as_slice).unwrap_or(&[]);
        for item in items {
            match CallbackEvent::from_item(item)? {
                CallbackEvent::Auth(event) => {
                    tracing::debug!(page_id = %page_id, time, "auth event received");
                    handler.auth_received(&page_id, time, event).await?;
                }
                CallbackEvent::Message(event) => {
                    tracing::debug!(page_id = %page_id, time, mid = %event.mid, "message received");
                    handler.message_received(&page_id, time, event).await?;
                }
                CallbackEvent::Delivery(event) => {
                    tracing::debug!(page_id = %page_id, time, watermark = event.watermark, "delivery receipt received");
                    handler.message_delivered(&page_id, time, event).await?;
                }
                CallbackEvent::Postback(event) => {
                    tracing::debug!(page_id = %page_id, time, "postback received");
                    handler.postback_received(&page_id, time, event).await?;
                }
            }
        }
    }

    Ok(())
}
