//! Rules deciding which activities get renamed and hidden.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Weekday};
use walkledger_core::activity::{Activity, ActivityUpdate};
use walkledger_core::error::LedgerError;

/// Inclusive latitude/longitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lng: f64,
    /// Eastern edge.
    pub max_lng: f64,
}

impl Geofence {
    /// Builds a geofence, checking that the bounds are ordered and on the
    /// globe.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` for inverted or out-of-range bounds.
    pub fn new(
        min_lat: f64,
        max_lat: f64,
        min_lng: f64,
        max_lng: f64,
    ) -> Result<Self, LedgerError> {
        if !(-90.0..=90.0).contains(&min_lat) || !(-90.0..=90.0).contains(&max_lat) {
            return Err(LedgerError::Validation(
                "geofence latitude must be within -90..=90".into(),
            ));
        }
        if !(-180.0..=180.0).contains(&min_lng) || !(-180.0..=180.0).contains(&max_lng) {
            return Err(LedgerError::Validation(
                "geofence longitude must be within -180..=180".into(),
            ));
        }
        if min_lat > max_lat || min_lng > max_lng {
            return Err(LedgerError::Validation("geofence minimum exceeds maximum".into()));
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Returns whether the point lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
    }
}

impl Default for Geofence {
    fn default() -> Self {
        Self {
            min_lat: 40.0,
            max_lat: 41.0,
            min_lng: -74.0,
            max_lng: -73.0,
        }
    }
}

/// Parses `min_lat,max_lat,min_lng,max_lng`.
impl FromStr for Geofence {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LedgerError::Validation(format!("invalid geofence {s:?}: {e}")))?;

        match parts.as_slice() {
            [min_lat, max_lat, min_lng, max_lng] => {
                Self::new(*min_lat, *max_lat, *min_lng, *max_lng)
            }
            _ => Err(LedgerError::Validation(format!(
                "geofence {s:?} must have four comma-separated values"
            ))),
        }
    }
}

/// Why an activity was left alone.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The sport type is not the targeted one.
    ActivityType {
        /// The type the upstream reported.
        actual: String,
    },
    /// The activity started on a Saturday or Sunday.
    Weekend,
    /// The activity has no start coordinates.
    NoLocation,
    /// The start point lies outside the geofence.
    OutsideGeofence {
        /// Start latitude.
        lat: f64,
        /// Start longitude.
        lng: f64,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActivityType { actual } => write!(f, "activity type {actual} is not targeted"),
            Self::Weekend => f.write_str("activity occurred on a weekend"),
            Self::NoLocation => f.write_str("activity has no location data"),
            Self::OutsideGeofence { lat, lng } => {
                write!(f, "start point ({lat}, {lng}) is outside the geofence")
            }
        }
    }
}

/// Result of evaluating the rules against an activity.
#[derive(Debug, Clone, PartialEq)]
pub enum Eligibility {
    /// Every rule passed.
    Eligible,
    /// The first failing rule.
    Ineligible(SkipReason),
}

/// Which activities to act on and what to change on them.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingRules {
    /// Sport type to match, compared case-insensitively.
    pub activity_type: String,
    /// Area the activity must start in.
    pub geofence: Geofence,
    /// Title given to matching activities.
    pub rename_to: String,
    /// Whether matching activities become private.
    pub make_private: bool,
}

impl Default for ProcessingRules {
    fn default() -> Self {
        Self {
            activity_type: "Walk".to_owned(),
            geofence: Geofence::default(),
            rename_to: "Rusty".to_owned(),
            make_private: true,
        }
    }
}

impl ProcessingRules {
    /// Evaluates the rules in order: type, weekday, location, geofence.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` if `start_date_local` is not RFC 3339.
    pub fn evaluate(&self, activity: &Activity) -> Result<Eligibility, LedgerError> {
        if !activity.activity_type.eq_ignore_ascii_case(&self.activity_type) {
            return Ok(Eligibility::Ineligible(SkipReason::ActivityType {
                actual: activity.activity_type.clone(),
            }));
        }

        // start_date_local carries local wall-clock time, so its weekday is the
        // athlete's weekday regardless of the offset suffix.
        let started = DateTime::parse_from_rfc3339(&activity.start_date_local).map_err(|e| {
            LedgerError::Validation(format!(
                "invalid start_date_local {:?}: {e}",
                activity.start_date_local
            ))
        })?;
        if matches!(started.weekday(), Weekday::Sat | Weekday::Sun) {
            return Ok(Eligibility::Ineligible(SkipReason::Weekend));
        }

        let Some((lat, lng)) = activity.start_point() else {
            return Ok(Eligibility::Ineligible(SkipReason::NoLocation));
        };
        if !self.geofence.contains(lat, lng) {
            return Ok(Eligibility::Ineligible(SkipReason::OutsideGeofence { lat, lng }));
        }

        Ok(Eligibility::Eligible)
    }

    /// The change applied to eligible activities.
    #[must_use]
    pub fn update(&self) -> ActivityUpdate {
        ActivityUpdate {
            name: self.rename_to.clone(),
            private: self.make_private,
        }
    }
}
