//! Walkledger Strava — `reqwest` implementation of `ActivityClient`.

pub mod client;

pub use client::{DEFAULT_BASE_URL, StravaClient};
