//! Ledger database schema.

use sqlx::SqlitePool;

/// SQL to create the processed-activities table. Safe to run repeatedly.
pub const CREATE_PROCESSED_ACTIVITIES_TABLE: &str =
    include_str!("../../../migrations/20260101000000_create_processed_activities.sql");

/// Creates the ledger table if it does not exist yet. Existing rows are left
/// untouched.
///
/// # Errors
///
/// Returns the underlying `sqlx::Error` if the statement fails.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_PROCESSED_ACTIVITIES_TABLE)
        .execute(pool)
        .await?;
    tracing::debug!("processed_activities schema ensured");
    Ok(())
}
