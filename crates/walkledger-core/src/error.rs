//! Ledger error types.

use thiserror::Error;

use crate::activity::ActivityId;

/// Top-level error type shared by the ledger, the upstream client and the
/// processing pipeline.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No ledger row exists for the activity.
    #[error("activity not found in ledger: {0}")]
    NotFound(ActivityId),

    /// The activity has already been recorded; the uniqueness constraint
    /// rejected the insert.
    #[error("activity {0} has already been processed")]
    DuplicateActivity(ActivityId),

    /// Input that cannot be interpreted (bad ids, malformed dates).
    #[error("validation error: {0}")]
    Validation(String),

    /// The upstream activity API failed or returned a non-success status.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A storage/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
