//! Webhook endpoints: subscription validation and event intake.

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use walkledger_core::error::LedgerError;
use walkledger_processing::domain::webhook::WebhookEvent;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters sent when the upstream validates a subscription.
#[derive(Debug, Deserialize)]
pub struct VerificationParams {
    /// Always `subscribe`.
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// Random string to echo back.
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
    /// Token chosen when the subscription was created.
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
}

/// Body echoing the challenge.
#[derive(Debug, Serialize)]
pub struct VerificationResponse {
    /// The challenge received.
    #[serde(rename = "hub.challenge")]
    pub challenge: String,
}

/// Body acknowledging an event delivery.
#[derive(Debug, Serialize)]
pub struct EventAck {
    /// Always `ok`.
    pub status: &'static str,
}

/// GET /webhook
#[instrument(skip(state, params), fields(mode = ?params.mode))]
async fn verify_subscription(
    State(state): State<AppState>,
    Query(params): Query<VerificationParams>,
) -> Result<Json<VerificationResponse>, ApiError> {
    if let Some(expected) = state.verify_token.as_deref() {
        if params.verify_token.as_deref() != Some(expected) {
            warn!("subscription validation with wrong verify token");
            return Err(ApiError::Forbidden("verify token mismatch".into()));
        }
    }

    let challenge = params
        .challenge
        .ok_or_else(|| LedgerError::Validation("hub.challenge is required".into()))?;

    info!("subscription validated");
    Ok(Json(VerificationResponse { challenge }))
}

/// POST /webhook
///
/// Acknowledges immediately; the activity is processed by the background
/// worker. Payloads that are not events are acknowledged and dropped.
#[instrument(skip(state, payload))]
async fn receive_event(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<EventAck>, ApiError> {
    let event = match serde_json::from_value::<WebhookEvent>(payload) {
        Ok(event) => event,
        Err(err) => {
            warn!(error = %err, "unrecognised webhook payload");
            return Ok(Json(EventAck { status: "ok" }));
        }
    };
    let correlation_id = Uuid::new_v4();

    match event.to_command(correlation_id)? {
        Some(command) => {
            info!(
                %correlation_id,
                object_id = event.object_id,
                "queueing activity for processing"
            );
            if let Err(err) = state.queue.enqueue(command) {
                warn!(%correlation_id, error = %err, "activity not queued");
            }
        }
        None => debug!(
            object_type = %event.object_type,
            aspect_type = %event.aspect_type,
            "event ignored"
        ),
    }

    Ok(Json(EventAck { status: "ok" }))
}

/// Returns the webhook router.
pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", get(verify_subscription).post(receive_event))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tokio::sync::mpsc;
    use tower::ServiceExt;
    use walkledger_core::activity::ActivityId;
    use walkledger_processing::application::worker;
    use walkledger_processing::domain::commands::ProcessActivity;
    use walkledger_test_support::InMemoryLedgerRepository;

    fn app_state(verify_token: Option<&str>) -> (AppState, mpsc::Receiver<ProcessActivity>) {
        let (queue, receiver) = worker::queue(8);
        let state = AppState::new(
            Arc::new(InMemoryLedgerRepository::new()),
            queue,
            verify_token.map(str::to_owned),
        );
        (state, receiver)
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = router().with_state(state).oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_event(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn activity_event(aspect_type: &str, object_id: u64) -> Value {
        serde_json::json!({
            "aspect_type": aspect_type,
            "event_time": 1_768_383_000_u64,
            "object_id": object_id,
            "object_type": "activity",
            "owner_id": 134_815,
            "subscription_id": 120_475,
            "updates": {}
        })
    }

    #[tokio::test]
    async fn test_verification_echoes_challenge() {
        // Arrange
        let (state, _rx) = app_state(Some("STRAVA"));

        // Act
        let (status, json) = send(
            state,
            get("/webhook?hub.mode=subscribe&hub.challenge=15f7d1a91c1f40f8a748fd134752feb3&hub.verify_token=STRAVA"),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["hub.challenge"], "15f7d1a91c1f40f8a748fd134752feb3");
    }

    #[tokio::test]
    async fn test_verification_rejects_wrong_token() {
        let (state, _rx) = app_state(Some("STRAVA"));

        let (status, json) = send(
            state,
            get("/webhook?hub.mode=subscribe&hub.challenge=abc&hub.verify_token=nope"),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "forbidden");
    }

    #[tokio::test]
    async fn test_verification_without_configured_token_accepts_any() {
        let (state, _rx) = app_state(None);

        let (status, json) = send(state, get("/webhook?hub.challenge=abc")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["hub.challenge"], "abc");
    }

    #[tokio::test]
    async fn test_verification_without_challenge_returns_400() {
        let (state, _rx) = app_state(None);

        let (status, json) = send(state, get("/webhook?hub.mode=subscribe")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_activity_event_is_queued() {
        // Arrange
        let (state, mut rx) = app_state(None);

        // Act
        let (status, json) = send(state, post_event(&activity_event("create", 12345))).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        let command = rx.try_recv().unwrap();
        assert_eq!(command.activity_id, ActivityId(12345));
    }

    #[tokio::test]
    async fn test_delete_event_is_acknowledged_but_not_queued() {
        let (state, mut rx) = app_state(None);

        let (status, _) = send(state, post_event(&activity_event("delete", 12345))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_oversized_object_id_returns_400() {
        let (state, mut rx) = app_state(None);

        let (status, json) = send(state, post_event(&activity_event("create", u64::MAX))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_event_is_acknowledged_when_queue_is_closed() {
        let (state, rx) = app_state(None);
        drop(rx);

        let (status, json) = send(state, post_event(&activity_event("create", 1))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_unrecognised_payload_is_acknowledged_and_dropped() {
        // Arrange
        let (state, mut rx) = app_state(None);

        // Act
        let (status, json) =
            send(state, post_event(&serde_json::json!({ "hello": "world" }))).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert!(rx.try_recv().is_err());
    }
}
