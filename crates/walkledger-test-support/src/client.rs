//! Test upstream clients — mock `ActivityClient` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use walkledger_core::activity::{Activity, ActivityId, ActivityUpdate};
use walkledger_core::error::LedgerError;
use walkledger_core::upstream::ActivityClient;

/// A weekday walk (Wednesday 2026-01-14) starting inside the default
/// geofence.
#[must_use]
pub fn walk_activity(id: i64) -> Activity {
    Activity {
        id: ActivityId(id),
        name: "Morning Walk".to_owned(),
        activity_type: "Walk".to_owned(),
        start_date_local: "2026-01-14T07:30:00Z".to_owned(),
        start_latlng: Some(vec![40.5, -73.5]),
    }
}

/// An activity client that serves one canned activity and records every
/// update call.
#[derive(Debug)]
pub struct StubActivityClient {
    activity: Option<Activity>,
    fail_updates: bool,
    fetches: Mutex<Vec<ActivityId>>,
    updates: Mutex<Vec<(ActivityId, ActivityUpdate)>>,
}

impl StubActivityClient {
    /// Serve `activity` for every fetch; updates succeed.
    #[must_use]
    pub fn returning(activity: Activity) -> Self {
        Self {
            activity: Some(activity),
            fail_updates: false,
            fetches: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    /// Every fetch fails with an upstream error.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            activity: None,
            fail_updates: true,
            fetches: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    /// Make update calls fail with an upstream error.
    #[must_use]
    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    /// Returns a snapshot of all fetched ids.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fetches(&self) -> Vec<ActivityId> {
        self.fetches.lock().unwrap().clone()
    }

    /// Returns a snapshot of all update calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn updates(&self) -> Vec<(ActivityId, ActivityUpdate)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivityClient for StubActivityClient {
    async fn fetch_activity(&self, activity_id: ActivityId) -> Result<Activity, LedgerError> {
        self.fetches.lock().unwrap().push(activity_id);
        self.activity
            .clone()
            .map(|activity| Activity {
                id: activity_id,
                ..activity
            })
            .ok_or_else(|| LedgerError::Upstream("connection refused".into()))
    }

    async fn update_activity(
        &self,
        activity_id: ActivityId,
        update: &ActivityUpdate,
    ) -> Result<(), LedgerError> {
        self.updates
            .lock()
            .unwrap()
            .push((activity_id, update.clone()));
        if self.fail_updates {
            return Err(LedgerError::Upstream(format!(
                "updating activity {activity_id} returned status 401 Unauthorized"
            )));
        }
        Ok(())
    }
}
