//! Application layer: command/query handlers and the background worker.

pub mod command_handlers;
pub mod query_handlers;
pub mod worker;
