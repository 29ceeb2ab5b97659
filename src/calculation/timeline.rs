//! Occupancy timeline construction.
//!
//! This module turns a session's membership rows into a gap-free,
//! non-overlapping sequence of elementary intervals, each with a constant
//! occupancy count and the set of memberships present.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::Membership;

/// An elementary interval of the session timeline.
///
/// During the interval, the set of present memberships (and therefore the
/// occupancy count) is constant. Intervals with occupancy 0 are kept so the
/// timeline covers the whole session; the allocation engine skips them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyInterval {
    /// The start of the interval.
    pub start_time: NaiveDateTime,
    /// The end of the interval.
    pub end_time: NaiveDateTime,
    /// The number of memberships present throughout the interval.
    pub occupancy: u32,
    /// The membership rows present, sorted by id.
    pub membership_ids: Vec<String>,
}

/// Builds the occupancy timeline for a session.
///
/// Every membership join and effective leave time becomes a breakpoint;
/// consecutive breakpoints form elementary intervals tagged with the
/// memberships whose presence covers them. The output is ordered, gap-free,
/// and covers `[start, end]` exactly; spans where nobody was present appear
/// as occupancy-0 intervals.
///
/// Open memberships are treated as ending at `end` — the session's end time
/// at finalization, or "now" for a live preview of an open session.
///
/// # Arguments
///
/// * `session_id` - The session being computed, for error context
/// * `start` - The session start time
/// * `end` - The computation horizon
/// * `memberships` - All membership rows of the session, closed or open
///
/// # Errors
///
/// Returns [`EngineError::InvalidInterval`] when a membership's leave time
/// precedes its join time, or when a join time lies outside `[start, end]`.
/// The session cannot be finalized until the offending row is corrected at
/// the source.
///
/// # Example
///
/// ```
/// use session_billing_engine::calculation::build_timeline;
/// use session_billing_engine::models::Membership;
/// use chrono::NaiveDateTime;
///
/// let parse = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let membership = Membership {
///     id: "m_001".to_string(),
///     session_id: "session_001".to_string(),
///     participant_id: "p_001".to_string(),
///     join_time: parse("2025-03-01 14:00:00"),
///     leave_time: Some(parse("2025-03-01 15:00:00")),
/// };
///
/// let timeline = build_timeline(
///     "session_001",
///     parse("2025-03-01 14:00:00"),
///     parse("2025-03-01 16:00:00"),
///     &[membership],
/// ).unwrap();
///
/// assert_eq!(timeline.len(), 2);
/// assert_eq!(timeline[0].occupancy, 1);
/// assert_eq!(timeline[1].occupancy, 0);
/// ```
pub fn build_timeline(
    session_id: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    memberships: &[Membership],
) -> EngineResult<Vec<OccupancyInterval>> {
    for membership in memberships {
        if let Some(leave) = membership.leave_time {
            if leave < membership.join_time {
                return Err(EngineError::InvalidInterval {
                    session_id: session_id.to_string(),
                    membership_id: membership.id.clone(),
                    message: format!(
                        "leave time {} precedes join time {}",
                        leave, membership.join_time
                    ),
                });
            }
        }
        if membership.join_time < start || membership.join_time > end {
            return Err(EngineError::InvalidInterval {
                session_id: session_id.to_string(),
                membership_id: membership.id.clone(),
                message: format!(
                    "join time {} is outside the session bounds [{}, {}]",
                    membership.join_time, start, end
                ),
            });
        }
    }

    if start >= end {
        return Ok(Vec::new());
    }

    let mut breakpoints = BTreeSet::new();
    breakpoints.insert(start);
    breakpoints.insert(end);
    for membership in memberships {
        breakpoints.insert(membership.join_time);
        breakpoints.insert(membership.effective_leave(end));
    }

    let breakpoints: Vec<NaiveDateTime> = breakpoints.into_iter().collect();
    let mut intervals = Vec::with_capacity(breakpoints.len() - 1);

    for pair in breakpoints.windows(2) {
        let (interval_start, interval_end) = (pair[0], pair[1]);

        let mut membership_ids: Vec<String> = memberships
            .iter()
            .filter(|m| {
                m.join_time <= interval_start && m.effective_leave(end) >= interval_end
            })
            .map(|m| m.id.clone())
            .collect();
        membership_ids.sort();

        intervals.push(OccupancyInterval {
            start_time: interval_start,
            end_time: interval_end,
            occupancy: membership_ids.len() as u32,
            membership_ids,
        });
    }

    Ok(intervals)
}
