//! Router and transport-boundary error mapping.
//!
//! This is the only place errors become HTTP: status comes from the error
//! kind, and the body keeps the numeric-prefix convention callers parse
//! (`"400 Bad Request; ..."`).

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use pagebot_core::{dispatch_callback, verify, EventHandler, VerifyQuery, WebhookConfig};
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<WebhookConfig>,
    pub handler: Arc<dyn EventHandler>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", get(verify_webhook).post(receive_callback))
        .route("/healthz", get(healthz))
        .with_state(state)
}

struct ApiError(pagebot_core::WebhookError);

impl From<pagebot_core::WebhookError> for ApiError {
    fn from(err: pagebot_core::WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.kind.code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, self.0.to_string()).into_response()
    }
}

async fn verify_webhook(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<String, ApiError> {
    let challenge = verify(&query, &state.config)?;
    Ok(challenge)
}

#[derive(Debug, Default, Deserialize)]
struct CallbackQuery {
    access_token: Option<String>,
}

async fn receive_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    Json(body): Json<Value>,
) -> Result<StatusCode, ApiError> {
    // Shared-secret precondition; nothing is validated or dispatched until
    // the caller proves itself.
    let token = query
        .access_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| pagebot_core::WebhookError::bad_request("missing access token"))?;
    if token != state.config.access_token {
        tracing::warn!("access token check failed");
        return Err(pagebot_core::WebhookError::forbidden("bad access token").into());
    }

    dispatch_callback(&body, state.handler.as_ref()).await?;
    Ok(StatusCode::OK)
}

async fn healthz() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
