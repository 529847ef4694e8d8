//! Routes for reading and manually appending to the processed-activity ledger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use walkledger_core::activity::ActivityId;
use walkledger_core::error::LedgerError;
use walkledger_core::ledger::ProcessedActivity;
use walkledger_processing::application::{command_handlers, query_handlers};
use walkledger_processing::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for GET /api/v1/processed-activities.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Maximum rows to return.
    pub limit: Option<u32>,
}

/// Response body listing ledger rows.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Ledger rows, newest first.
    pub activities: Vec<ProcessedActivity>,
}

/// Request body for POST /api/v1/processed-activities.
#[derive(Debug, Deserialize)]
pub struct MarkProcessedRequest {
    /// The upstream activity to record.
    pub activity_id: ActivityId,
    /// Explicit processing time; defaults to insertion time.
    pub processed_at: Option<DateTime<Utc>>,
}

fn positive(activity_id: ActivityId) -> Result<ActivityId, LedgerError> {
    if activity_id.get() > 0 {
        Ok(activity_id)
    } else {
        Err(LedgerError::Validation(format!(
            "activity_id must be positive, got {activity_id}"
        )))
    }
}

/// GET /api/v1/processed-activities
#[instrument(skip(state))]
async fn list_processed(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError> {
    let activities =
        query_handlers::list_processed_activities(params.limit, state.ledger.as_ref()).await?;
    Ok(Json(ListResponse { activities }))
}

/// GET /api/v1/processed-activities/{activity_id}
#[instrument(skip(state))]
async fn get_processed(
    State(state): State<AppState>,
    Path(activity_id): Path<i64>,
) -> Result<Json<ProcessedActivity>, ApiError> {
    let row =
        query_handlers::get_processed_activity(ActivityId(activity_id), state.ledger.as_ref())
            .await?;
    Ok(Json(row))
}

/// POST /api/v1/processed-activities
#[instrument(skip(state, request), fields(activity_id = %request.activity_id))]
async fn mark_processed(
    State(state): State<AppState>,
    Json(request): Json<MarkProcessedRequest>,
) -> Result<(StatusCode, Json<ProcessedActivity>), ApiError> {
    let command = commands::MarkProcessed {
        correlation_id: Uuid::new_v4(),
        activity_id: positive(request.activity_id)?,
        processed_at: request.processed_at,
    };

    info!(correlation_id = %command.correlation_id, "handling mark_processed command");

    let row = command_handlers::handle_mark_processed(&command, state.ledger.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// Returns the router for the ledger endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/processed-activities",
            get(list_processed).post(mark_processed),
        )
        .route("/api/v1/processed-activities/{activity_id}", get(get_processed))
}
