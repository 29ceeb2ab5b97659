//! Membership model.
//!
//! A membership is one continuous presence of a participant in a session.
//! A participant who leaves and rejoins gets a fresh membership row, so
//! per-row computed costs line up with the check-in schema.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One continuous presence of a participant in a session.
///
/// `leave_time` is absent while the participant is still present. The
/// participant reference is an opaque key; identity resolution is handled
/// by the check-in API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Unique identifier for the membership row.
    pub id: String,
    /// The session this membership belongs to.
    pub session_id: String,
    /// Opaque participant key.
    pub participant_id: String,
    /// When the participant joined the session.
    pub join_time: NaiveDateTime,
    /// When the participant left; `None` while still present.
    pub leave_time: Option<NaiveDateTime>,
}

impl Membership {
    /// Returns the time this membership stops counting toward occupancy,
    /// given a computation horizon.
    ///
    /// Open rows end at the horizon (the session's end time at
    /// finalization, "now" for a live preview). Closed rows whose leave
    /// time runs past the horizon are clamped to it, matching the lifecycle
    /// rule that ending a session force-closes its open rows.
    pub fn effective_leave(&self, horizon: NaiveDateTime) -> NaiveDateTime {
        match self.leave_time {
            Some(leave) => leave.min(horizon),
            None => horizon,
        }
    }
}
