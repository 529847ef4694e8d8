//! Route modules.

pub mod health;
pub mod processed_activities;
pub mod webhook;
