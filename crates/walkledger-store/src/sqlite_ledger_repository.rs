//! `SQLite` implementation of the `LedgerRepository` trait.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use walkledger_core::activity::ActivityId;
use walkledger_core::error::LedgerError;
use walkledger_core::ledger::{NewProcessedActivity, ProcessedActivity};
use walkledger_core::repository::LedgerRepository;

const INSERT_SQL: &str = r"
INSERT INTO processed_activities (activity_id, processed_at)
VALUES (?1, COALESCE(?2, CURRENT_TIMESTAMP))
RETURNING id, activity_id, processed_at
";

const FIND_SQL: &str = r"
SELECT id, activity_id, processed_at
FROM processed_activities
WHERE activity_id = ?1
";

const CONTAINS_SQL: &str = r"
SELECT EXISTS(SELECT 1 FROM processed_activities WHERE activity_id = ?1)
";

const LIST_RECENT_SQL: &str = r"
SELECT id, activity_id, processed_at
FROM processed_activities
ORDER BY id DESC
LIMIT ?1
";

/// Raw ledger row. `processed_at` is nullable in the schema because it only
/// carries a default.
#[derive(Debug, sqlx::FromRow)]
struct ProcessedActivityRow {
    id: i64,
    activity_id: i64,
    processed_at: Option<NaiveDateTime>,
}

impl From<ProcessedActivityRow> for ProcessedActivity {
    fn from(row: ProcessedActivityRow) -> Self {
        Self {
            id: row.id,
            activity_id: ActivityId(row.activity_id),
            processed_at: row.processed_at.map(|at| at.and_utc()),
        }
    }
}

fn infrastructure(err: &sqlx::Error) -> LedgerError {
    LedgerError::Infrastructure(err.to_string())
}

/// `SQLite` processed-activity ledger.
#[derive(Debug, Clone)]
pub struct SqliteLedgerRepository {
    pool: SqlitePool,
}

impl SqliteLedgerRepository {
    /// Creates a new `SqliteLedgerRepository`.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerRepository for SqliteLedgerRepository {
    async fn record(&self, entry: NewProcessedActivity) -> Result<ProcessedActivity, LedgerError> {
        let result = sqlx::query_as::<_, ProcessedActivityRow>(INSERT_SQL)
            .bind(entry.activity_id.get())
            .bind(entry.processed_at.map(|at| at.naive_utc()))
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => {
                tracing::debug!(
                    activity_id = %entry.activity_id,
                    id = row.id,
                    "ledger row inserted"
                );
                Ok(row.into())
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(LedgerError::DuplicateActivity(entry.activity_id))
            }
            Err(err) => Err(infrastructure(&err)),
        }
    }

    async fn find(
        &self,
        activity_id: ActivityId,
    ) -> Result<Option<ProcessedActivity>, LedgerError> {
        let row = sqlx::query_as::<_, ProcessedActivityRow>(FIND_SQL)
            .bind(activity_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| infrastructure(&e))?;

        Ok(row.map(ProcessedActivity::from))
    }

    async fn contains(&self, activity_id: ActivityId) -> Result<bool, LedgerError> {
        let exists = sqlx::query_scalar::<_, i64>(CONTAINS_SQL)
            .bind(activity_id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| infrastructure(&e))?;

        Ok(exists != 0)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<ProcessedActivity>, LedgerError> {
        let rows = sqlx::query_as::<_, ProcessedActivityRow>(LIST_RECENT_SQL)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| infrastructure(&e))?;

        Ok(rows.into_iter().map(ProcessedActivity::from).collect())
    }
}
