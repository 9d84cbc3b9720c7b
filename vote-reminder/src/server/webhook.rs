//! Webhook endpoint handler.
//!
//! Accepts vote deliveries, checks the shared authorization secret and hands
//! the vote to the tracker. Recording happens in the background; the
//! response does not wait for the store.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use vote_reminder_shared::types::{Environment, VoteEvent};

use super::AppState;

/// `type` value that marks a delivery triggered from the test button.
const TEST_VOTE_TYPE: &str = "test";

/// Errors that can occur when processing a webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The `Authorization` header is missing or does not match.
    #[error("unauthorized")]
    Unauthorized,

    /// The body is not a vote payload.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::Unauthorized => StatusCode::FORBIDDEN,
            WebhookError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}

/// Vote delivery body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    /// Id of the voted bot, for bot votes.
    #[serde(default)]
    pub bot: Option<String>,
    /// Id of the voted server, for server votes.
    #[serde(default)]
    pub guild: Option<String>,
    /// Id of the voting user.
    pub user: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub is_weekend: Option<bool>,
    /// Query string of the vote page URL, if any.
    #[serde(default)]
    pub query: Option<String>,
}

impl WebhookPayload {
    pub fn environment(&self) -> Environment {
        if self.kind == TEST_VOTE_TYPE {
            Environment::Test
        } else {
            Environment::Production
        }
    }
}

/// Webhook handler.
///
/// # Response
///
/// - 204 No Content: Vote accepted
/// - 400 Bad Request: Body is not a JSON object with a string `user`
/// - 403 Forbidden: Missing or wrong `Authorization` header
pub async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, WebhookError> {
    // Check the secret before touching the body.
    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if provided != Some(&*state.authorization) {
        warn!("Rejected webhook with invalid authorization");
        return Err(WebhookError::Unauthorized);
    }

    let raw: Value = serde_json::from_slice(&body)?;
    if !raw.is_object() {
        return Err(WebhookError::InvalidPayload(
            "expected a JSON object".to_string(),
        ));
    }
    let payload: WebhookPayload = serde_json::from_value(raw.clone())?;
    let environment = payload.environment();

    debug!(
        subject_id = %payload.user,
        environment = %environment,
        bot = ?payload.bot,
        guild = ?payload.guild,
        "Received vote"
    );

    // The write is fire-and-forget; failures are logged by the dispatcher.
    drop(
        state
            .tracker
            .handle_vote(VoteEvent::new(payload.user, environment, raw)),
    );

    Ok(StatusCode::NO_CONTENT)
}
