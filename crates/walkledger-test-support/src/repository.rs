//! Test repositories — mock `LedgerRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use walkledger_core::activity::ActivityId;
use walkledger_core::error::LedgerError;
use walkledger_core::ledger::{NewProcessedActivity, ProcessedActivity};
use walkledger_core::repository::LedgerRepository;

/// A ledger held in memory. Assigns ids sequentially from 1 and rejects
/// duplicate activity ids the way the storage constraint does.
#[derive(Debug, Default)]
pub struct InMemoryLedgerRepository {
    rows: Mutex<Vec<ProcessedActivity>>,
}

impl InMemoryLedgerRepository {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger that already contains `activity_ids`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_processed(activity_ids: &[i64]) -> Self {
        let repo = Self::new();
        {
            let mut rows = repo.rows.lock().unwrap();
            for (index, id) in activity_ids.iter().enumerate() {
                rows.push(ProcessedActivity {
                    id: i64::try_from(index + 1).unwrap(),
                    activity_id: ActivityId(*id),
                    processed_at: Some(Utc::now()),
                });
            }
        }
        repo
    }

    /// Returns a snapshot of all rows.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn rows(&self) -> Vec<ProcessedActivity> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn record(&self, entry: NewProcessedActivity) -> Result<ProcessedActivity, LedgerError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.activity_id == entry.activity_id) {
            return Err(LedgerError::DuplicateActivity(entry.activity_id));
        }
        let row = ProcessedActivity {
            id: rows.last().map_or(1, |r| r.id + 1),
            activity_id: entry.activity_id,
            processed_at: Some(entry.processed_at.unwrap_or_else(Utc::now)),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find(
        &self,
        activity_id: ActivityId,
    ) -> Result<Option<ProcessedActivity>, LedgerError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.activity_id == activity_id)
            .cloned())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<ProcessedActivity>, LedgerError> {
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}

/// A ledger that always returns an infrastructure error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingLedgerRepository;

#[async_trait]
impl LedgerRepository for FailingLedgerRepository {
    async fn record(&self, _entry: NewProcessedActivity) -> Result<ProcessedActivity, LedgerError> {
        Err(LedgerError::Infrastructure("database is locked".into()))
    }

    async fn find(
        &self,
        _activity_id: ActivityId,
    ) -> Result<Option<ProcessedActivity>, LedgerError> {
        Err(LedgerError::Infrastructure("database is locked".into()))
    }

    async fn list_recent(&self, _limit: u32) -> Result<Vec<ProcessedActivity>, LedgerError> {
        Err(LedgerError::Infrastructure("database is locked".into()))
    }
}
