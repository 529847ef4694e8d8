//! Walkledger — activity processing.
//!
//! Turns webhook deliveries into `ProcessActivity` commands, consults the
//! processed-activity ledger to skip repeats, applies the walk rules, updates
//! the upstream activity and records it as processed.

pub mod application;
pub mod domain;
