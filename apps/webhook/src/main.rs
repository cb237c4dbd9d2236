//! Pagebot webhook entrypoint: GET verification handshake and POST callback
//! dispatch for a Messenger-style page integration.

use std::sync::Arc;

use anyhow::Result;
use pagebot_core::{EventHandler, MessengerSender, ProfileClient, TemplateStore, WebhookConfig};
use pagebot_webhook::{build_router, AppState, EchoBot};

#[tokio::main]
async fn main() -> Result<()> {
    pagebot_telemetry::install("pagebot-webhook")?;

    let config = Arc::new(WebhookConfig::load()?);
    let store = TemplateStore::new(&config.templates_dir);
    let sender = Arc::new(MessengerSender::new(&config)?);
    let profiles = Arc::new(ProfileClient::new(&config)?);
    let handler: Arc<dyn EventHandler> = Arc::new(EchoBot::new(store, sender, profiles));

    let app = build_router(AppState {
        config: config.clone(),
        handler,
    });

    let addr: std::net::SocketAddr = std::env::var("BIND")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()?;
    tracing::info!("pagebot-webhook listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
