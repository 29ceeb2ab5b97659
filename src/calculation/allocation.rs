//! Cost allocation with deterministic rounding.
//!
//! This module integrates rate × duration over the split timeline segments
//! and divides each segment's cost equally among the memberships present,
//! then reconciles the rounded per-membership amounts against the rounded
//! grand total with a largest-remainder rule so no cent is created or lost.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use super::day_night::{DaySide, TimelineSegment};
use super::tier::resolve_rate;
use crate::error::EngineResult;
use crate::models::{CostLine, Location};

/// One cent, the rounding unit for all billed amounts.
const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// The outcome of allocating a session's segments.
///
/// `costs` maps membership id to its rounded cost; the map's sum equals
/// `grand_total` exactly. Memberships never present in a charged segment do
/// not appear; the caller fills in zero rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome {
    /// The charged intervals, in chronological order.
    pub lines: Vec<CostLine>,
    /// Rounded cost per membership id.
    pub costs: BTreeMap<String, Decimal>,
    /// The rounded grand total for the session.
    pub grand_total: Decimal,
    /// Chargeable hours on the day side.
    pub day_hours: Decimal,
    /// Chargeable hours on the night side.
    pub night_hours: Decimal,
}

/// Allocates costs across the memberships present in each segment.
///
/// For every segment with occupancy above 0, the segment cost is
/// `rate × duration` and each present membership accrues an equal share.
/// Segments with occupancy 0 contribute no cost and emit no line. The sum
/// of all segment costs is the room's rate-integrated total for the
/// session, independent of how many participants shared it; allocation
/// only redistributes that total.
///
/// After all segments are processed, per-membership accumulators are
/// rounded to two decimal places with a largest-remainder rule: every
/// accumulator is floored to whole cents, then the cents still missing
/// against the rounded grand total are handed out one at a time, largest
/// fractional remainder first, ties broken by ascending membership id.
/// Recomputation on identical inputs is therefore bit-identical.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::Configuration`] when a charged
/// segment's occupancy has no covering tier.
pub fn allocate(
    location: &Location,
    segments: &[TimelineSegment],
) -> EngineResult<AllocationOutcome> {
    let mut lines = Vec::new();
    let mut raw: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut day_hours = Decimal::ZERO;
    let mut night_hours = Decimal::ZERO;

    for segment in segments {
        if segment.occupancy == 0 {
            continue;
        }

        let resolved = resolve_rate(location, segment.occupancy, segment.side)?;
        let seconds = (segment.end_time - segment.start_time).num_seconds();
        // A single division keeps whole-minute durations exact
        let amount = resolved.rate * Decimal::new(seconds, 0) / Decimal::new(3600, 0);

        match segment.side {
            DaySide::Day => day_hours += segment.hours,
            DaySide::Night => night_hours += segment.hours,
        }

        let share = amount / Decimal::from(segment.occupancy);
        for membership_id in &segment.membership_ids {
            *raw.entry(membership_id.clone()).or_insert(Decimal::ZERO) += share;
        }

        lines.push(CostLine {
            start_time: segment.start_time,
            end_time: segment.end_time,
            side: segment.side,
            occupancy: segment.occupancy,
            tier_min: resolved.tier_min,
            tier_max: resolved.tier_max,
            rate: resolved.rate,
            hours: segment.hours,
            amount,
            membership_ids: segment.membership_ids.clone(),
        });
    }

    let grand_total: Decimal = lines.iter().map(|l| l.amount).sum();
    let grand_rounded =
        grand_total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let costs = round_largest_remainder(&raw, grand_rounded);

    Ok(AllocationOutcome {
        lines,
        costs,
        grand_total: grand_rounded,
        day_hours,
        night_hours,
    })
}

/// Rounds the raw accumulators so their sum equals the rounded grand total.
///
/// Floors every accumulator to whole cents, then distributes the missing
/// cents in order of largest fractional remainder, ascending membership id
/// on ties. The deficit is always between zero and one cent per membership,
/// so a single pass over the ordering suffices.
fn round_largest_remainder(
    raw: &BTreeMap<String, Decimal>,
    grand_rounded: Decimal,
) -> BTreeMap<String, Decimal> {
    let mut rounded: BTreeMap<String, Decimal> = raw
        .iter()
        .map(|(id, amount)| (id.clone(), amount.trunc_with_scale(2)))
        .collect();

    let floored_sum: Decimal = rounded.values().copied().sum();
    let mut deficit = grand_rounded - floored_sum;

    let mut order: Vec<&String> = raw.keys().collect();
    order.sort_by(|a, b| {
        let rem_a = raw[*a] - rounded[*a];
        let rem_b = raw[*b] - rounded[*b];
        rem_b.cmp(&rem_a).then_with(|| a.cmp(b))
    });

    for membership_id in order {
        if deficit < CENT {
            break;
        }
        if let Some(amount) = rounded.get_mut(membership_id) {
            *amount += CENT;
            deficit -= CENT;
        }
    }

    rounded
}
