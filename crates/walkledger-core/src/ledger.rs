//! Processed-activity ledger records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityId;

/// A row of the append-only processed-activity ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedActivity {
    /// Local surrogate identifier, assigned monotonically by storage.
    pub id: i64,
    /// Upstream activity identifier; unique across the ledger.
    pub activity_id: ActivityId,
    /// When the row was inserted. The column only carries a default, so rows
    /// written with an explicit NULL have no timestamp.
    pub processed_at: Option<DateTime<Utc>>,
}

/// Insert request for the ledger. `processed_at` falls back to the storage
/// clock when `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewProcessedActivity {
    /// Upstream activity identifier.
    pub activity_id: ActivityId,
    /// Explicit processing time, if any.
    pub processed_at: Option<DateTime<Utc>>,
}

impl NewProcessedActivity {
    /// Creates an insert request stamped with the storage default time.
    #[must_use]
    pub fn new(activity_id: ActivityId) -> Self {
        Self {
            activity_id,
            processed_at: None,
        }
    }

    /// Sets an explicit processing time.
    #[must_use]
    pub fn at(mut self, processed_at: DateTime<Utc>) -> Self {
        self.processed_at = Some(processed_at);
        self
    }
}
