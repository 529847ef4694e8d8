//! Walkledger Store — `SQLite` persistence for the processed-activity ledger.

pub mod pool;
pub mod schema;
pub mod sqlite_ledger_repository;
