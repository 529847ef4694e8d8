//! Commands for activity processing.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use walkledger_core::activity::ActivityId;
use walkledger_core::command::Command;

/// Command to process an activity announced by a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessActivity {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The upstream activity to process.
    pub activity_id: ActivityId,
}

impl Command for ProcessActivity {
    fn command_type(&self) -> &'static str {
        "process_activity"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn activity_id(&self) -> ActivityId {
        self.activity_id
    }
}

/// Command to record an activity as processed without touching upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkProcessed {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The upstream activity to record.
    pub activity_id: ActivityId,
    /// Explicit processing time; storage default when absent.
    pub processed_at: Option<DateTime<Utc>>,
}

impl Command for MarkProcessed {
    fn command_type(&self) -> &'static str {
        "mark_processed"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn activity_id(&self) -> ActivityId {
        self.activity_id
    }
}
