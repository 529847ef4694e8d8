//! Upstream activity API abstraction.

use async_trait::async_trait;

use crate::activity::{Activity, ActivityId, ActivityUpdate};
use crate::error::LedgerError;

/// Client for the service that owns the activities and delivers webhooks.
#[async_trait]
pub trait ActivityClient: Send + Sync {
    /// Fetches the full activity.
    async fn fetch_activity(&self, activity_id: ActivityId) -> Result<Activity, LedgerError>;

    /// Applies `update` to the activity.
    async fn update_activity(
        &self,
        activity_id: ActivityId,
        update: &ActivityUpdate,
    ) -> Result<(), LedgerError>;
}
