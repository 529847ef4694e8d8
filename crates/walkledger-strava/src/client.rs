//! HTTP client for the Strava v3 activities API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument};

use walkledger_core::activity::{Activity, ActivityId, ActivityUpdate};
use walkledger_core::error::LedgerError;
use walkledger_core::upstream::ActivityClient;

/// Public Strava API root.
pub const DEFAULT_BASE_URL: &str = "https://www.strava.com/api/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `ActivityClient` backed by the Strava REST API.
#[derive(Debug, Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl StravaClient {
    /// Builds a client for `base_url` authenticating with `access_token`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Infrastructure` if the HTTP client cannot be
    /// constructed (e.g. TLS backend initialization fails).
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LedgerError::Infrastructure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            access_token: access_token.into(),
        })
    }

    fn activity_url(&self, activity_id: ActivityId) -> String {
        format!("{}/activities/{activity_id}", self.base_url)
    }
}

fn transport_error(activity_id: ActivityId, err: &reqwest::Error) -> LedgerError {
    LedgerError::Upstream(format!("request for activity {activity_id} failed: {err}"))
}

fn status_error(activity_id: ActivityId, action: &str, status: StatusCode) -> LedgerError {
    LedgerError::Upstream(format!(
        "{action} activity {activity_id} returned status {status}"
    ))
}

/// Form body for the update call. The API expects `private` as `1` or `0`.
fn update_form(update: &ActivityUpdate) -> [(&'static str, String); 2] {
    [
        ("name", update.name.clone()),
        ("private", if update.private { "1" } else { "0" }.to_owned()),
    ]
}

#[async_trait]
impl ActivityClient for StravaClient {
    #[instrument(skip(self))]
    async fn fetch_activity(&self, activity_id: ActivityId) -> Result<Activity, LedgerError> {
        let response = self
            .http
            .get(self.activity_url(activity_id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| transport_error(activity_id, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(activity_id, "fetching", status));
        }

        let activity = response
            .json::<Activity>()
            .await
            .map_err(|e| LedgerError::Upstream(format!("invalid activity payload: {e}")))?;
        debug!(activity_type = %activity.activity_type, "activity fetched");
        Ok(activity)
    }

    #[instrument(skip(self, update), fields(name = %update.name, private = update.private))]
    async fn update_activity(
        &self,
        activity_id: ActivityId,
        update: &ActivityUpdate,
    ) -> Result<(), LedgerError> {
        let response = self
            .http
            .put(self.activity_url(activity_id))
            .bearer_auth(&self.access_token)
            .form(&update_form(update))
            .send()
            .await
            .map_err(|e| transport_error(activity_id, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(activity_id, "updating", status));
        }

        debug!("activity updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_url_strips_trailing_slash() {
        let client = StravaClient::new("https://example.test/api/v3/", "token").unwrap();

        assert_eq!(
            client.activity_url(ActivityId(12345)),
            "https://example.test/api/v3/activities/12345"
        );
    }

    #[test]
    fn test_update_form_encodes_private_flag() {
        let update = ActivityUpdate {
            name: "Rusty".to_owned(),
            private: true,
        };

        let form = update_form(&update);

        assert_eq!(form[0], ("name", "Rusty".to_owned()));
        assert_eq!(form[1], ("private", "1".to_owned()));
    }

    #[tokio::test]
    async fn test_fetch_activity_maps_transport_failure_to_upstream_error() {
        // Port 9 (discard) on localhost is not an HTTP server.
        let client = StravaClient::new("http://127.0.0.1:9", "token").unwrap();

        let result = client.fetch_activity(ActivityId(1)).await;

        assert!(matches!(result, Err(LedgerError::Upstream(_))));
    }
}
