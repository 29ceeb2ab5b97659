//! Cost computation orchestration and finalization.
//!
//! This module wires the pipeline together — timeline construction,
//! day/night splitting, allocation — and assembles the [`AllocationResult`].
//! It also provides [`SessionFinalizer`], which serializes finalization
//! per session and enforces the settled-session recomputation policy.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use super::allocation::allocate;
use super::day_night::split_by_side;
use super::timeline::build_timeline;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AllocationResult, CostTotals, Location, Membership, MembershipCost, Session, SettlementRecord,
};

/// Computes per-membership costs for an ended session.
///
/// This is the engine's main entry point: a pure function of the rate
/// table, the session bounds and cutoff, and the membership rows. Open
/// membership rows are treated as ending at the session's end time.
/// Recomputing on identical inputs yields identical lines, costs, and
/// totals; only the provenance metadata (`computation_id`, `computed_at`)
/// differs per run.
///
/// # Errors
///
/// * [`EngineError::NotEnded`] - the session has no end time yet
/// * [`EngineError::InvalidInterval`] - a membership row has malformed timing
/// * [`EngineError::Configuration`] - the rate table is malformed or does
///   not cover an observed occupancy count
///
/// # Example
///
/// ```
/// use session_billing_engine::calculation::compute_costs;
/// use session_billing_engine::models::{Location, Membership, RateTier, Session};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let parse = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let location = Location {
///     id: "downtown".to_string(),
///     name: "Downtown Rooms".to_string(),
///     tiers: vec![RateTier {
///         group_min: 1,
///         group_max: 3,
///         day_rate: Decimal::new(30, 0),
///         night_rate: Decimal::new(45, 0),
///     }],
///     day_night_cutoff: None,
/// };
/// let session = Session {
///     id: "session_001".to_string(),
///     location_id: "downtown".to_string(),
///     start_time: parse("2025-03-01 14:00:00"),
///     end_time: Some(parse("2025-03-01 16:00:00")),
///     day_night_cutoff: None,
/// };
/// let memberships = vec![Membership {
///     id: "m_001".to_string(),
///     session_id: "session_001".to_string(),
///     participant_id: "p_001".to_string(),
///     join_time: parse("2025-03-01 14:00:00"),
///     leave_time: None,
/// }];
///
/// let result = compute_costs(&location, &session, &memberships).unwrap();
/// assert_eq!(result.totals.grand_total, Decimal::new(6000, 2)); // 60.00
/// ```
pub fn compute_costs(
    location: &Location,
    session: &Session,
    memberships: &[Membership],
) -> EngineResult<AllocationResult> {
    let end = session.end_time.ok_or_else(|| EngineError::NotEnded {
        session_id: session.id.clone(),
    })?;

    compute_with_horizon(location, session, memberships, end)
}

/// Computes a read-only cost preview for a session that may still be open.
///
/// Open membership rows are treated as ending at `now`. For an ended
/// session this is identical to [`compute_costs`].
pub fn preview_costs(
    location: &Location,
    session: &Session,
    memberships: &[Membership],
    now: NaiveDateTime,
) -> EngineResult<AllocationResult> {
    let horizon = session.end_time.unwrap_or(now);
    compute_with_horizon(location, session, memberships, horizon)
}

fn compute_with_horizon(
    location: &Location,
    session: &Session,
    memberships: &[Membership],
    horizon: NaiveDateTime,
) -> EngineResult<AllocationResult> {
    location.validate()?;

    let timeline = build_timeline(&session.id, session.start_time, horizon, memberships)?;
    let cutoff = session.effective_cutoff(location);
    let segments = split_by_side(&timeline, cutoff);
    let outcome = allocate(location, &segments)?;

    // Every membership row gets a cost entry; rows never present in a
    // charged segment come out at zero
    let mut costs: Vec<MembershipCost> = memberships
        .iter()
        .map(|m| MembershipCost {
            membership_id: m.id.clone(),
            participant_id: m.participant_id.clone(),
            amount: outcome
                .costs
                .get(&m.id)
                .copied()
                .unwrap_or(Decimal::new(0, 2)),
        })
        .collect();
    costs.sort_by(|a, b| a.membership_id.cmp(&b.membership_id));

    let totals = CostTotals {
        grand_total: outcome.grand_total,
        day_hours: outcome.day_hours,
        night_hours: outcome.night_hours,
        billable_hours: outcome.day_hours + outcome.night_hours,
    };

    Ok(AllocationResult {
        computation_id: Uuid::new_v4(),
        computed_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        session_id: session.id.clone(),
        lines: outcome.lines,
        costs,
        totals,
    })
}

/// Serializes cost finalization per session.
///
/// Membership rows are mutated concurrently by join/leave requests while a
/// session is active; holding the session's lock across the snapshot-and-
/// compute step keeps "end session" from racing a late join. Different
/// sessions never contend.
///
/// The finalizer also enforces the settlement policy: once a session's
/// settlement record is final, recomputation requires an explicit override.
#[derive(Debug, Default)]
pub struct SessionFinalizer {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionFinalizer {
    /// Creates a finalizer with no sessions tracked yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalizes a session's costs while holding its lock.
    ///
    /// The caller is expected to read the membership snapshot and apply the
    /// resulting costs under the same lock, via the same finalizer, as its
    /// membership mutations for this session.
    ///
    /// # Errors
    ///
    /// Everything [`compute_costs`] returns, plus
    /// [`EngineError::AlreadySettled`] when `settlement` is final and
    /// `override_settled` is false. On error the session simply remains
    /// un-finalized; the computation is idempotent, so retrying after the
    /// inputs are corrected is safe.
    pub fn finalize(
        &self,
        location: &Location,
        session: &Session,
        memberships: &[Membership],
        settlement: Option<&SettlementRecord>,
        override_settled: bool,
    ) -> EngineResult<AllocationResult> {
        let lock = self.lock_for(&session.id);
        let _guard = lock.lock().unwrap_or_else(|poisoned| {
            // A panic in a previous finalization attempt cannot leave
            // partial state behind; the computation owns none
            poisoned.into_inner()
        });

        if let Some(record) = settlement {
            if record.is_final && !override_settled {
                warn!(
                    session_id = %session.id,
                    "Refusing to recompute costs for a settled session without an override"
                );
                return Err(EngineError::AlreadySettled {
                    session_id: session.id.clone(),
                });
            }
        }

        let result = compute_costs(location, session, memberships)?;
        info!(
            session_id = %session.id,
            memberships = memberships.len(),
            grand_total = %result.totals.grand_total,
            "Finalized session costs"
        );

        Ok(result)
    }

    fn lock_for(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
