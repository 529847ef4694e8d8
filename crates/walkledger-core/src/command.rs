//! Command abstractions.

use uuid::Uuid;

use crate::activity::ActivityId;

/// A request to act on one upstream activity.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Short name used in logs.
    fn command_type(&self) -> &'static str;

    /// Traces the command from webhook delivery to ledger write.
    fn correlation_id(&self) -> Uuid;

    /// The activity the command targets.
    fn activity_id(&self) -> ActivityId;
}
