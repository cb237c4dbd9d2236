//! Built-in echo bot.
//!
//! Stands in for a real dialog engine: logs every event and answers text
//! messages with an echoed `text_message` template through the sender.

use std::sync::Arc;

use pagebot_core::{
    make_message, AuthEvent, DeliveryEvent, EventHandler, MessageContent, MessageEvent,
    MessengerSender, PostbackEvent, ProfileClient, TemplateStore, WebhookError,
};
use serde_json::{json, Map};

pub struct EchoBot {
    store: TemplateStore,
    sender: Arc<MessengerSender>,
    profiles: Arc<ProfileClient>,
}

impl EchoBot {
    pub fn new(
        store: TemplateStore,
        sender: Arc<MessengerSender>,
        profiles: Arc<ProfileClient>,
    ) -> Self {
        Self {
            store,
            sender,
            profiles,
        }
    }
}

#[async_trait::async_trait]
impl EventHandler for EchoBot {
    async fn auth_received(
        &self,
        page_id: &str,
        time: i64,
        event: AuthEvent,
    ) -> Result<(), WebhookError> {
        tracing::debug!(page_id = %page_id, time, sender_id = %event.sender_id, pass_through = %event.pass_through, "auth recv");
        Ok(())
    }

    async fn message_received(
        &self,
        page_id: &str,
        time: i64,
        event: MessageEvent,
    ) -> Result<(), WebhookError> {
        tracing::debug!(page_id = %page_id, time, sender_id = %event.sender_id, mid = %event.mid, "message recv");
        let profile = self.profiles.get(&event.sender_id).await?;
        tracing::debug!(
            sender_id = %event.sender_id,
            first_name = profile.first_name.as_deref().unwrap_or(""),
            "hello"
        );
        match &event.content {
            MessageContent::Text(text) => {
                let mut data = Map::new();
                data.insert("message_text".to_string(), json!(format!("Echo: {text}")));
                let reply = make_message(
                    &self.store,
                    &event.sender_id,
                    "text_message",
                    Some(&data),
                    None,
                )?;
                self.sender.send(&reply).await?;
            }
            MessageContent::Attachments(attachments) => {
                tracing::debug!(count = attachments.len(), "attachment message; nothing to echo");
            }
        }
        Ok(())
    }

    async fn message_delivered(
        &self,
        page_id: &str,
        time: i64,
        event: DeliveryEvent,
    ) -> Result<(), WebhookError> {
        tracing::debug!(page_id = %page_id, time, watermark = event.watermark, seq = event.seq, "message delivered");
        Ok(())
    }

    async fn postback_received(
        &self,
        page_id: &str,
        time: i64,
        event: PostbackEvent,
    ) -> Result<(), WebhookError> {
        tracing::debug!(page_id = %page_id, time, sender_id = %event.sender_id, payload = %event.payload, "postback recv");
        Ok(())
    }
}
