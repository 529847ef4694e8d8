//! Walkledger API — error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use walkledger_core::error::LedgerError;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Ledger or upstream client setup error.
    #[error("startup error: {0}")]
    Ledger(#[from] LedgerError),

    /// Tracing or telemetry exporter setup error.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// A ledger, validation or upstream failure.
    Ledger(LedgerError),
    /// The caller presented the wrong verification token.
    Forbidden(String),
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, "forbidden", message),
            Self::Ledger(err) => {
                let (status, code) = match &err {
                    LedgerError::NotFound(_) => (StatusCode::NOT_FOUND, "activity_not_found"),
                    LedgerError::DuplicateActivity(_) => {
                        (StatusCode::CONFLICT, "duplicate_activity")
                    }
                    LedgerError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                    LedgerError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
                    LedgerError::Infrastructure(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
                    }
                };
                (status, code, err.to_string())
            }
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use walkledger_core::activity::ActivityId;

    fn status_of(err: LedgerError) -> StatusCode {
        let response = ApiError::from(err).into_response();
        response.status()
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            status_of(LedgerError::NotFound(ActivityId(1))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_duplicate_activity_maps_to_409() {
        assert_eq!(
            status_of(LedgerError::DuplicateActivity(ActivityId(12345))),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(LedgerError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_upstream_maps_to_502() {
        assert_eq!(
            status_of(LedgerError::Upstream("status 500".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(LedgerError::Infrastructure("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let response = ApiError::Forbidden("verify token mismatch".into()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
