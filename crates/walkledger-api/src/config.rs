//! Server configuration read from the environment.

use std::fmt;
use std::net::SocketAddr;

use walkledger_processing::domain::rules::{Geofence, ProcessingRules};
use walkledger_strava::DEFAULT_BASE_URL;

use crate::error::AppError;

const DEFAULT_DATABASE_URL: &str = "sqlite://processed_activities.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Runtime configuration for the API server.
#[derive(Clone)]
pub struct Config {
    /// `SQLite` database URL.
    pub database_url: String,
    /// Listen host.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Bearer token for the upstream activity API.
    pub strava_access_token: String,
    /// Upstream API root.
    pub strava_api_base_url: String,
    /// Expected `hub.verify_token` during subscription validation.
    pub strava_verify_token: Option<String>,
    /// Which activities to update and how.
    pub rules: ProcessingRules,
    /// Bound of the webhook processing queue.
    pub worker_queue_capacity: usize,
    /// OTLP collector endpoint; span export is off when unset.
    pub otel_endpoint: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("strava_access_token", &"<redacted>")
            .field("strava_api_base_url", &self.strava_api_base_url)
            .field(
                "strava_verify_token",
                &self.strava_verify_token.as_ref().map(|_| "<redacted>"),
            )
            .field("rules", &self.rules)
            .field("worker_queue_capacity", &self.worker_queue_capacity)
            .field("otel_endpoint", &self.otel_endpoint)
            .finish()
    }
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let strava_access_token = get("STRAVA_ACCESS_TOKEN").ok_or_else(|| {
            AppError::Config("STRAVA_ACCESS_TOKEN environment variable must be set".into())
        })?;

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };

        let worker_queue_capacity = match get("WORKER_QUEUE_CAPACITY") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "WORKER_QUEUE_CAPACITY must be a positive integer, got {raw:?}"
                    ))
                })?,
            None => DEFAULT_QUEUE_CAPACITY,
        };

        let mut rules = ProcessingRules::default();
        if let Some(activity_type) = get("TARGET_ACTIVITY_TYPE") {
            rules.activity_type = activity_type;
        }
        if let Some(rename_to) = get("RENAME_TO") {
            rules.rename_to = rename_to;
        }
        if let Some(raw) = get("GEOFENCE") {
            rules.geofence = raw
                .parse::<Geofence>()
                .map_err(|e| AppError::Config(format!("GEOFENCE: {e}")))?;
        }

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            strava_access_token,
            strava_api_base_url: get("STRAVA_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            strava_verify_token: get("STRAVA_VERIFY_TOKEN"),
            rules,
            worker_queue_capacity,
            otel_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn listen_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
