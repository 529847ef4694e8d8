//! Webhook event payloads delivered by the upstream service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use walkledger_core::activity::ActivityId;
use walkledger_core::error::LedgerError;

use super::commands::ProcessActivity;

/// A push notification about an object owned by a subscribed athlete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// `create`, `update` or `delete`.
    pub aspect_type: String,
    /// Unix time of the change.
    pub event_time: u64,
    /// Activity or athlete id, depending on `object_type`.
    pub object_id: u64,
    /// `activity` or `athlete`.
    pub object_type: String,
    /// Athlete that owns the object.
    pub owner_id: u64,
    /// Push subscription that produced the event.
    pub subscription_id: u64,
    /// Changed fields for `update` events.
    #[serde(default)]
    pub updates: Option<serde_json::Value>,
}

impl WebhookEvent {
    /// Returns whether the event concerns an activity that still exists.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        self.object_type == "activity" && self.aspect_type != "delete"
    }

    /// Converts the event into a processing command, or `None` when the
    /// event is not actionable.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` if `object_id` does not fit an
    /// `ActivityId`.
    pub fn to_command(&self, correlation_id: Uuid) -> Result<Option<ProcessActivity>, LedgerError> {
        if !self.is_actionable() {
            return Ok(None);
        }
        let activity_id = ActivityId::try_from(self.object_id)?;
        Ok(Some(ProcessActivity {
            correlation_id,
            activity_id,
        }))
    }
}
