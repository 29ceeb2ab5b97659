//! Day/night detection and timeline segmentation logic.
//!
//! This module provides utilities for determining which side of a
//! location's day/night cutoff any datetime falls on, and for splitting
//! occupancy intervals at cutoff and midnight crossings so that every
//! resulting segment is priced with a single rate.

use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::timeline::OccupancyInterval;

/// Which side of the day/night cutoff an instant falls on.
///
/// A calendar day is on the day side from midnight up to the cutoff and on
/// the night side from the cutoff up to the next midnight, so the day-to-
/// night boundary is the cutoff instant and the night-to-day boundary is
/// midnight.
///
/// # Example
///
/// ```
/// use session_billing_engine::calculation::DaySide;
///
/// let side = DaySide::Night;
/// assert_eq!(format!("{:?}", side), "Night");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaySide {
    /// Between midnight and the cutoff; day rates apply.
    Day,
    /// Between the cutoff and the next midnight; night rates apply.
    Night,
}

impl std::fmt::Display for DaySide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DaySide::Day => write!(f, "Day"),
            DaySide::Night => write!(f, "Night"),
        }
    }
}

/// Determines the day/night side for a given datetime.
///
/// # Arguments
///
/// * `datetime` - The instant to check
/// * `cutoff` - The location's day/night cutoff hour
///
/// # Example
///
/// ```
/// use session_billing_engine::calculation::{DaySide, side_of};
/// use chrono::{NaiveDateTime, NaiveTime};
///
/// let cutoff = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
///
/// let afternoon = NaiveDateTime::parse_from_str("2025-03-01 14:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(side_of(afternoon, cutoff), DaySide::Day);
///
/// let evening = NaiveDateTime::parse_from_str("2025-03-01 18:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(side_of(evening, cutoff), DaySide::Night);
/// ```
pub fn side_of(datetime: NaiveDateTime, cutoff: NaiveTime) -> DaySide {
    if datetime.time() < cutoff {
        DaySide::Day
    } else {
        DaySide::Night
    }
}

/// An occupancy interval that lies entirely on one side of the cutoff.
///
/// Produced by [`split_by_side`]; the allocation engine prices each segment
/// with the single rate its side and occupancy select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSegment {
    /// The start time of this segment.
    pub start_time: NaiveDateTime,
    /// The end time of this segment.
    pub end_time: NaiveDateTime,
    /// The side of the cutoff this segment falls on.
    pub side: DaySide,
    /// The number of memberships present throughout this segment.
    pub occupancy: u32,
    /// The membership rows present, sorted by id.
    pub membership_ids: Vec<String>,
    /// The segment duration in hours.
    pub hours: Decimal,
}

/// Splits occupancy intervals at day/night boundary crossings.
///
/// Any interval that straddles a cutoff instant or a midnight is cut there,
/// per calendar day, so a multi-day interval may be split several times.
/// Total duration is preserved exactly and the operation is idempotent:
/// re-splitting already-split segments changes nothing.
///
/// # Arguments
///
/// * `intervals` - The gap-free occupancy timeline
/// * `cutoff` - The day/night cutoff in effect for the session
///
/// # Returns
///
/// A vector of [`TimelineSegment`]s in chronological order, each entirely
/// on one side of the cutoff, carrying the occupancy and membership set of
/// the interval it was cut from.
///
/// # Example
///
/// ```
/// use session_billing_engine::calculation::{DaySide, OccupancyInterval, split_by_side};
/// use chrono::{NaiveDateTime, NaiveTime};
///
/// let parse = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let interval = OccupancyInterval {
///     start_time: parse("2025-03-01 17:00:00"),
///     end_time: parse("2025-03-01 19:00:00"),
///     occupancy: 2,
///     membership_ids: vec!["m_001".to_string(), "m_002".to_string()],
/// };
///
/// let cutoff = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
/// let segments = split_by_side(&[interval], cutoff);
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].side, DaySide::Day);
/// assert_eq!(segments[1].side, DaySide::Night);
/// ```
pub fn split_by_side(intervals: &[OccupancyInterval], cutoff: NaiveTime) -> Vec<TimelineSegment> {
    let mut segments = Vec::new();

    for interval in intervals {
        let mut current_start = interval.start_time;
        let interval_end = interval.end_time;

        while current_start < interval_end {
            // Segment ends at the next boundary crossing or the interval
            // end, whichever comes first
            let boundary = next_boundary(current_start, cutoff);
            let segment_end = if boundary <= interval_end {
                boundary
            } else {
                interval_end
            };

            let hours = calculate_hours(current_start, segment_end);
            if hours > Decimal::ZERO {
                segments.push(TimelineSegment {
                    start_time: current_start,
                    end_time: segment_end,
                    side: side_of(current_start, cutoff),
                    occupancy: interval.occupancy,
                    membership_ids: interval.membership_ids.clone(),
                    hours,
                });
            }

            current_start = segment_end;
        }
    }

    segments
}

/// Returns the first boundary crossing strictly after `datetime`: the
/// cutoff instant of the current or next calendar day, or the next
/// midnight, whichever comes first.
fn next_boundary(datetime: NaiveDateTime, cutoff: NaiveTime) -> NaiveDateTime {
    let next_midnight = (datetime.date() + chrono::Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .expect("Valid midnight time");

    if datetime.time() < cutoff {
        datetime.date().and_time(cutoff)
    } else {
        next_midnight
    }
}

/// Calculates the number of hours between two datetimes.
pub(crate) fn calculate_hours(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    let duration_seconds = (end - start).num_seconds();
    Decimal::new(duration_seconds, 0) / Decimal::new(3600, 0)
}
