//! HTTP route handlers for the Parley API.
//!
//! The chat surface is deliberately soft: upstream trouble never becomes an
//! HTTP error here, because the chat UI must not look broken over a
//! third-party outage. Only handler-internal faults get a 500.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::provider::extract::extract_reply;
use crate::provider::title::generate_title;

use super::state::AppState;

/// Fixed reply returned when the provider call fails outright.
pub const UPSTREAM_FAILURE_REPLY: &str =
    "Sorry, I couldn't come up with a reply right now. Please try again.";

/// Fixed reply returned when the provider answered but no text could be
/// extracted from the body.
pub const NO_CONTENT_REPLY: &str = "Sorry, I didn't get a usable reply back. Please try again.";

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/generate-title", post(generate_title_handler))
        .route("/api/health", get(health))
        .route("/api/models", get(list_models))
        .with_state(state)
}

/// Body accepted by the chat and title endpoints.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// The user's message. Missing and empty are both rejected with a 400.
    #[serde(default)]
    pub message: String,
}

/// Response for `POST /api/chat`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant reply; always present.
    pub reply: String,
}

/// Response for `POST /api/generate-title`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TitleResponse {
    /// Cleaned title, or null when none was produced.
    pub title: Option<String>,
    /// Whether the upstream call returned extractable text.
    pub ok: bool,
}

/// Error body for 4xx/5xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short error tag.
    pub error: String,
    /// Human-readable detail, present on handler-internal faults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Relay one user message to the provider and return a reply.
///
/// The `reply` field is always present: upstream failures and unextractable
/// bodies degrade to fixed apology texts rather than error statuses.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorBody>)> {
    let prompt = request.message.trim();
    if prompt.is_empty() {
        return Err(bad_request("missing message"));
    }

    let outcome = state.provider.call(prompt).await;
    if !outcome.succeeded {
        tracing::warn!(
            status = outcome.http_status,
            raw = outcome.raw_excerpt(),
            "provider returned non-success for chat"
        );
        return Ok(Json(ChatResponse {
            reply: UPSTREAM_FAILURE_REPLY.to_string(),
        }));
    }

    let reply = match extract_reply(outcome.parsed_body.as_ref()) {
        Some(text) => text,
        None => {
            tracing::warn!(
                raw = outcome.raw_excerpt(),
                "provider response had no extractable text"
            );
            NO_CONTENT_REPLY.to_string()
        }
    };

    Ok(Json(ChatResponse { reply }))
}

/// Produce a short title for a seed message.
async fn generate_title_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<TitleResponse>, (StatusCode, Json<ErrorBody>)> {
    let seed = request.message.trim();
    if seed.is_empty() {
        return Err(bad_request("missing message"));
    }

    let generated = generate_title(&state.provider, seed).await;
    Ok(Json(TitleResponse {
        title: generated.title,
        ok: generated.ok,
    }))
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "model": state.provider.model(),
    }))
}

/// Relay the provider's model listing. Diagnostic surface: upstream
/// statuses pass through unmasked, and only a transport failure on this
/// hop becomes a handler-internal 500.
async fn list_models(State(state): State<Arc<AppState>>) -> Response {
    let outcome = state.provider.list_models().await;

    if outcome.http_status == 0 {
        return internal_error("provider unreachable", &outcome.raw_body).into_response();
    }

    let status = StatusCode::from_u16(outcome.http_status).unwrap_or(StatusCode::BAD_GATEWAY);
    match outcome.parsed_body {
        Some(body) => (status, Json(body)).into_response(),
        None => (status, outcome.raw_body).into_response(),
    }
}

fn bad_request(error: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: error.to_string(),
            detail: None,
        }),
    )
}

fn internal_error(error: &str, detail: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: error.to_string(),
            detail: Some(detail.to_string()),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderConfig;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn make_app() -> Router {
        // Points at an unroutable address; these tests exercise validation,
        // health, and the soft-failure contract without a live provider.
        let config = ProviderConfig::new()
            .with_api_key("test-key")
            .with_base_url("http://127.0.0.1:9")
            .with_attempts(1)
            .with_retry_base_delay(std::time::Duration::from_millis(1));
        let state = AppState::with_config(config).unwrap();
        create_router(state)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let app = make_app();
        let resp = app
            .oneshot(post_json("/api/chat", r#"{"message": "  "}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let error: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "missing message");
    }

    #[tokio::test]
    async fn test_chat_rejects_missing_message_field() {
        let app = make_app();
        let resp = app.oneshot(post_json("/api/chat", "{}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_title_rejects_empty_message() {
        let app = make_app();
        let resp = app
            .oneshot(post_json("/api/generate-title", r#"{"message": ""}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let app = make_app();
        let resp = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["ok"], true);
        assert_eq!(health["model"], "models/gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_chat_unreachable_provider_still_replies_200() {
        // The provider address is unroutable: the call wrapper reports a
        // transport failure and the handler downgrades it to the apology.
        let app = make_app();
        let resp = app
            .oneshot(post_json("/api/chat", r#"{"message": "hello"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 4096).await.unwrap();
        let chat: ChatResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(chat.reply, UPSTREAM_FAILURE_REPLY);
    }

    #[tokio::test]
    async fn test_title_unreachable_provider_returns_null_title() {
        let app = make_app();
        let resp = app
            .oneshot(post_json("/api/generate-title", r#"{"message": "hello"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 4096).await.unwrap();
        let title: TitleResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(title.title, None);
        assert!(!title.ok);
    }

    #[tokio::test]
    async fn test_models_unreachable_provider_is_internal_error() {
        let app = make_app();
        let resp = app
            .oneshot(Request::get("/api/models").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(resp.into_body(), 4096).await.unwrap();
        let error: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "provider unreachable");
        assert!(error.detail.is_some());
    }
}
