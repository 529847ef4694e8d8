//! Time source for ledger timestamps.

use chrono::{DateTime, SubsecRound, Utc};

/// Source of the `processed_at` timestamps written by the pipeline.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Current time truncated to whole seconds, the resolution SQLite's
    /// `CURRENT_TIMESTAMP` default produces.
    fn now_seconds(&self) -> DateTime<Utc> {
        self.now().trunc_subsecs(0)
    }
}

/// Production clock backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
