//! Domain layer: commands, webhook payloads and processing rules.

pub mod commands;
pub mod rules;
pub mod webhook;
