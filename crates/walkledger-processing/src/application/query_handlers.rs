//! Query handlers for the processed-activity ledger.

use tracing::instrument;
use walkledger_core::activity::ActivityId;
use walkledger_core::error::LedgerError;
use walkledger_core::ledger::ProcessedActivity;
use walkledger_core::repository::LedgerRepository;

/// Rows returned when the caller does not ask for a limit.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Upper bound on rows returned by one listing.
pub const MAX_LIST_LIMIT: u32 = 500;

/// Returns the ledger row for an activity.
///
/// # Errors
///
/// Returns `LedgerError::NotFound` if the activity has not been processed.
#[instrument(skip(ledger))]
pub async fn get_processed_activity(
    activity_id: ActivityId,
    ledger: &dyn LedgerRepository,
) -> Result<ProcessedActivity, LedgerError> {
    ledger
        .find(activity_id)
        .await?
        .ok_or(LedgerError::NotFound(activity_id))
}

/// Returns the newest ledger rows. `limit` is clamped to
/// `1..=MAX_LIST_LIMIT` and defaults to `DEFAULT_LIST_LIMIT`.
///
/// # Errors
///
/// Returns `LedgerError::Infrastructure` on storage failure.
#[instrument(skip(ledger))]
pub async fn list_processed_activities(
    limit: Option<u32>,
    ledger: &dyn LedgerRepository,
) -> Result<Vec<ProcessedActivity>, LedgerError> {
    let limit = limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    ledger.list_recent(limit).await
}
