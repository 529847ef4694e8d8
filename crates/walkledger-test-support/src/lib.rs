//! Shared test mocks and utilities for walkledger.

mod client;
mod clock;
mod repository;

pub use client::{StubActivityClient, walk_activity};
pub use clock::FixedClock;
pub use repository::{FailingLedgerRepository, InMemoryLedgerRepository};
