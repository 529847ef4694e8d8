//! Integration tests for the processed-activity ledger endpoints.

mod common;

use axum::http::StatusCode;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_ledger_assigns_ids_and_rejects_duplicates(pool: SqlitePool) {
    let uri = "/api/v1/processed-activities";

    // First insert.
    let (app, _rx) = common::build_test_app(pool.clone());
    let (status, json) =
        common::post_json(app, uri, &serde_json::json!({ "activity_id": 12345 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["id"], 1);

    // Same activity again.
    let (app, _rx) = common::build_test_app(pool.clone());
    let (status, json) =
        common::post_json(app, uri, &serde_json::json!({ "activity_id": 12345 })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "duplicate_activity");

    // A new activity gets the next id.
    let (app, _rx) = common::build_test_app(pool);
    let (status, json) =
        common::post_json(app, uri, &serde_json::json!({ "activity_id": 67890 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["id"], 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_recorded_activity_is_readable(pool: SqlitePool) {
    let (app, _rx) = common::build_test_app(pool.clone());
    let (status, _) = common::post_json(
        app,
        "/api/v1/processed-activities",
        &serde_json::json!({
            "activity_id": 4242,
            "processed_at": "2026-01-15T10:00:00Z"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (app, _rx) = common::build_test_app(pool.clone());
    let (status, json) = common::get_json(app, "/api/v1/processed-activities/4242").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["activity_id"], 4242);
    assert_eq!(json["processed_at"], "2026-01-15T10:00:00Z");

    let (app, _rx) = common::build_test_app(pool);
    let (status, json) = common::get_json(app, "/api/v1/processed-activities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["activities"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_get_unprocessed_activity_returns_404(pool: SqlitePool) {
    let (app, _rx) = common::build_test_app(pool);

    let (status, json) = common::get_json(app, "/api/v1/processed-activities/1").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "activity_not_found");
}
