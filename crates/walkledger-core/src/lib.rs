//! Walkledger Core — shared domain abstractions.
//!
//! This crate defines the ledger record types and the traits that the
//! storage, upstream client and processing crates depend on. It contains no
//! infrastructure code.

pub mod activity;
pub mod clock;
pub mod command;
pub mod error;
pub mod ledger;
pub mod repository;
pub mod upstream;
