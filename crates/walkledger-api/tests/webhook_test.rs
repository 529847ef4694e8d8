//! Integration tests for webhook intake through to the ledger.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use sqlx::SqlitePool;
use walkledger_core::activity::ActivityId;
use walkledger_processing::application::command_handlers::ProcessOutcome;
use walkledger_processing::application::worker::ActivityWorker;
use walkledger_processing::domain::rules::ProcessingRules;
use walkledger_store::sqlite_ledger_repository::SqliteLedgerRepository;
use walkledger_test_support::{FixedClock, StubActivityClient, walk_activity};

fn activity_event(object_id: u64) -> serde_json::Value {
    serde_json::json!({
        "aspect_type": "create",
        "event_time": 1_768_383_000_u64,
        "object_id": object_id,
        "object_type": "activity",
        "owner_id": 134_815,
        "subscription_id": 120_475
    })
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_subscription_validation_round_trip(pool: SqlitePool) {
    let (app, _rx) = common::build_test_app(pool);

    let (status, json) = common::get_json(
        app,
        &format!(
            "/webhook?hub.mode=subscribe&hub.challenge=15f7d1a9&hub.verify_token={}",
            common::VERIFY_TOKEN
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hub.challenge"], "15f7d1a9");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_deliveries_update_upstream_once(pool: SqlitePool) {
    // Arrange
    let client = Arc::new(StubActivityClient::returning(walk_activity(0)));
    let worker = ActivityWorker::new(
        Arc::new(FixedClock::reference()),
        Arc::new(SqliteLedgerRepository::new(pool.clone())),
        client.clone(),
        Arc::new(ProcessingRules::default()),
    );

    // Act: the same activity is delivered twice.
    let mut outcomes = Vec::new();
    for _ in 0..2 {
        let (app, mut rx) = common::build_test_app(pool.clone());
        let (status, _) = common::post_json(app, "/webhook", &activity_event(12345)).await;
        assert_eq!(status, StatusCode::OK);

        let command = rx.try_recv().unwrap();
        assert_eq!(command.activity_id, ActivityId(12345));
        outcomes.push(worker.process(&command).await.unwrap());
    }

    // Assert
    assert!(matches!(outcomes[0], ProcessOutcome::Updated { .. }));
    assert_eq!(outcomes[1], ProcessOutcome::AlreadyProcessed);
    assert_eq!(client.updates().len(), 1);

    let (app, _rx) = common::build_test_app(pool);
    let (status, json) = common::get_json(app, "/api/v1/processed-activities/12345").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], 1);
    assert_eq!(json["processed_at"], "2026-01-15T10:00:00Z");
}
