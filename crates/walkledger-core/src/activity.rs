//! Upstream activity identifiers and payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Identifier assigned to an activity by the upstream webhook source.
///
/// Stored as a signed 64-bit integer because that is what the ledger's
/// `INTEGER` column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub i64);

impl ActivityId {
    /// Returns the raw integer value.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for ActivityId {
    type Error = LedgerError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| LedgerError::Validation(format!("activity id {value} exceeds i64 range")))
    }
}

/// An activity as returned by the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Upstream identifier.
    pub id: ActivityId,
    /// Activity title.
    pub name: String,
    /// Sport type, e.g. `Walk` or `Run`.
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Local start time in RFC 3339 form.
    pub start_date_local: String,
    /// `[latitude, longitude]` of the start point; empty or absent without GPS.
    #[serde(default)]
    pub start_latlng: Option<Vec<f64>>,
}

impl Activity {
    /// Returns the start point as `(latitude, longitude)` when both
    /// coordinates are present.
    #[must_use]
    pub fn start_point(&self) -> Option<(f64, f64)> {
        match self.start_latlng.as_deref() {
            Some([lat, lng]) => Some((*lat, *lng)),
            _ => None,
        }
    }
}

/// Changes applied to an upstream activity once it passes the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityUpdate {
    /// New activity title.
    pub name: String,
    /// Whether the activity becomes visible to the owner only.
    pub private: bool,
}
