//! Session model.
//!
//! A session is one timed booking of a room at a location. Sessions are
//! created and mutated by the surrounding check-in API; the engine only
//! reads them.

use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Location;

/// A timed group session at a location.
///
/// `end_time` is absent while the session is active. Once set it is
/// immutable and at least `start_time`; setting it force-closes every open
/// membership at that instant (enforced by the check-in API, relied upon
/// here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for the session.
    pub id: String,
    /// The location this session took place at.
    pub location_id: String,
    /// When the session started.
    pub start_time: NaiveDateTime,
    /// When the session ended; `None` while still active.
    pub end_time: Option<NaiveDateTime>,
    /// Per-session override of the location's day/night cutoff.
    #[serde(default)]
    pub day_night_cutoff: Option<NaiveTime>,
}

impl Session {
    /// Returns true once the session has an end time.
    pub fn is_ended(&self) -> bool {
        self.end_time.is_some()
    }

    /// Returns the day/night cutoff in effect for this session.
    ///
    /// A session-level override wins over the location's configured value,
    /// which in turn wins over the engine default.
    ///
    /// # Example
    ///
    /// ```
    /// use session_billing_engine::models::{Location, RateTier, Session};
    /// use chrono::{NaiveDateTime, NaiveTime};
    /// use rust_decimal::Decimal;
    ///
    /// let location = Location {
    ///     id: "downtown".to_string(),
    ///     name: "Downtown Rooms".to_string(),
    ///     tiers: vec![RateTier {
    ///         group_min: 1,
    ///         group_max: 20,
    ///         day_rate: Decimal::new(30, 0),
    ///         night_rate: Decimal::new(45, 0),
    ///     }],
    ///     day_night_cutoff: NaiveTime::from_hms_opt(19, 0, 0),
    /// };
    /// let session = Session {
    ///     id: "session_001".to_string(),
    ///     location_id: "downtown".to_string(),
    ///     start_time: NaiveDateTime::parse_from_str("2025-03-01 14:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     end_time: None,
    ///     day_night_cutoff: None,
    /// };
    /// assert_eq!(session.effective_cutoff(&location), NaiveTime::from_hms_opt(19, 0, 0).unwrap());
    /// ```
    pub fn effective_cutoff(&self, location: &Location) -> NaiveTime {
        self.day_night_cutoff.unwrap_or_else(|| location.effective_cutoff())
    }

    /// Returns the session duration in hours, or `None` while still active.
    pub fn duration_hours(&self) -> Option<Decimal> {
        self.end_time.map(|end| {
            let minutes = (end - self.start_time).num_minutes();
            Decimal::new(minutes, 0) / Decimal::new(60, 0)
        })
    }
}
