//! Walkledger API — webhook receiver and processed-activity ledger endpoints.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::webhook::router())
        .merge(routes::processed_activities::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
