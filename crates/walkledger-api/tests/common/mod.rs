//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tower::ServiceExt;
use walkledger_api::state::AppState;
use walkledger_processing::application::worker;
use walkledger_processing::domain::commands::ProcessActivity;
use walkledger_store::sqlite_ledger_repository::SqliteLedgerRepository;

/// Verify token configured for every test app.
pub const VERIFY_TOKEN: &str = "STRAVA";

/// Build the full app router over a real `SqliteLedgerRepository`. The
/// returned receiver sees every command the webhook enqueues.
pub fn build_test_app(pool: SqlitePool) -> (Router, mpsc::Receiver<ProcessActivity>) {
    let (queue, receiver) = worker::queue(16);
    let ledger = Arc::new(SqliteLedgerRepository::new(pool));
    let state = AppState::new(ledger, queue, Some(VERIFY_TOKEN.to_owned()));
    (walkledger_api::app(state), receiver)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
