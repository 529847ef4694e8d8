//! Ledger repository abstraction.

use async_trait::async_trait;

use crate::activity::ActivityId;
use crate::error::LedgerError;
use crate::ledger::{NewProcessedActivity, ProcessedActivity};

/// Repository trait for the append-only processed-activity ledger.
///
/// Rows are never updated or deleted, so the trait only exposes inserts and
/// reads.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Records an activity as processed.
    ///
    /// Returns `LedgerError::DuplicateActivity` when the activity id is
    /// already present.
    async fn record(&self, entry: NewProcessedActivity) -> Result<ProcessedActivity, LedgerError>;

    /// Looks up the ledger row for an activity.
    async fn find(&self, activity_id: ActivityId)
    -> Result<Option<ProcessedActivity>, LedgerError>;

    /// Returns whether the activity has already been processed.
    async fn contains(&self, activity_id: ActivityId) -> Result<bool, LedgerError> {
        Ok(self.find(activity_id).await?.is_some())
    }

    /// Returns up to `limit` rows, newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<ProcessedActivity>, LedgerError>;
}
