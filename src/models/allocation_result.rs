//! Allocation result models for the cost-allocation engine.
//!
//! This module contains the [`AllocationResult`] type and its associated
//! structures that capture all outputs from a cost computation, plus the
//! administrative records ([`AdjustedCost`], [`SettlementRecord`]) and the
//! reconciliation report built from them.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::DaySide;

/// One charged elementary interval, recorded for audit.
///
/// Each line captures an interval during which occupancy and day/night side
/// were both constant, the tier and rate that priced it, and the membership
/// rows the amount was divided across.
///
/// # Example
///
/// ```
/// use session_billing_engine::calculation::DaySide;
/// use session_billing_engine::models::CostLine;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let line = CostLine {
///     start_time: NaiveDateTime::parse_from_str("2025-03-01 14:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     end_time: NaiveDateTime::parse_from_str("2025-03-01 16:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     side: DaySide::Day,
///     occupancy: 2,
///     tier_min: 1,
///     tier_max: 3,
///     rate: Decimal::from_str("30").unwrap(),
///     hours: Decimal::from_str("2").unwrap(),
///     amount: Decimal::from_str("60").unwrap(),
///     membership_ids: vec!["m_001".to_string(), "m_002".to_string()],
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLine {
    /// The start of the interval.
    pub start_time: NaiveDateTime,
    /// The end of the interval.
    pub end_time: NaiveDateTime,
    /// Which side of the day/night cutoff the interval falls on.
    pub side: DaySide,
    /// The number of memberships present throughout the interval.
    pub occupancy: u32,
    /// The lower bound of the tier that priced this interval.
    pub tier_min: u32,
    /// The upper bound of the tier that priced this interval.
    pub tier_max: u32,
    /// The hourly rate applied.
    pub rate: Decimal,
    /// The interval duration in hours.
    pub hours: Decimal,
    /// The interval cost (rate × hours), before allocation.
    pub amount: Decimal,
    /// The membership rows present, sorted by id.
    pub membership_ids: Vec<String>,
}

/// The computed cost for one membership row.
///
/// Keyed by membership identity, not participant identity, so a participant
/// who leaves and rejoins accumulates into separate rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipCost {
    /// The membership row this cost belongs to.
    pub membership_id: String,
    /// The participant the row belongs to, carried through for display.
    pub participant_id: String,
    /// The rounded computed cost.
    pub amount: Decimal,
}

/// Aggregated totals for a cost computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTotals {
    /// The rounded grand total for the session. Equals the sum of all
    /// per-membership amounts exactly.
    pub grand_total: Decimal,
    /// Chargeable hours on the day side (occupancy > 0).
    pub day_hours: Decimal,
    /// Chargeable hours on the night side (occupancy > 0).
    pub night_hours: Decimal,
    /// Total chargeable hours.
    pub billable_hours: Decimal,
}

/// The complete result of a session cost computation.
///
/// `lines`, `costs`, and `totals` are deterministic functions of the
/// inputs; `computation_id` and `computed_at` are provenance metadata
/// stamped per run.
///
/// # Example
///
/// ```
/// use session_billing_engine::models::{AllocationResult, CostTotals};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let result = AllocationResult {
///     computation_id: Uuid::new_v4(),
///     computed_at: Utc::now(),
///     engine_version: "0.1.0".to_string(),
///     session_id: "session_001".to_string(),
///     lines: vec![],
///     costs: vec![],
///     totals: CostTotals {
///         grand_total: Decimal::ZERO,
///         day_hours: Decimal::ZERO,
///         night_hours: Decimal::ZERO,
///         billable_hours: Decimal::ZERO,
///     },
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Unique identifier for this computation run.
    pub computation_id: Uuid,
    /// When the computation ran.
    pub computed_at: DateTime<Utc>,
    /// The engine version that produced this result.
    pub engine_version: String,
    /// The session the costs belong to.
    pub session_id: String,
    /// The charged intervals, in chronological order.
    pub lines: Vec<CostLine>,
    /// Per-membership computed costs, sorted by membership id.
    pub costs: Vec<MembershipCost>,
    /// Aggregated totals.
    pub totals: CostTotals,
}

impl AllocationResult {
    /// Looks up the computed cost for a membership row.
    pub fn cost_for(&self, membership_id: &str) -> Option<Decimal> {
        self.costs
            .iter()
            .find(|c| c.membership_id == membership_id)
            .map(|c| c.amount)
    }
}

/// An administrative override of a computed cost.
///
/// When present for a membership, the adjusted amount supersedes the
/// computed one for billing, but the computed value is kept for audit.
/// Recorded by admins; the engine only reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustedCost {
    /// The membership row the override applies to.
    pub membership_id: String,
    /// The amount to bill instead of the computed cost.
    pub amount: Decimal,
    /// Why the override was made.
    #[serde(default)]
    pub reason: Option<String>,
}

/// The session-level amount actually collected.
///
/// Recorded independently of per-participant costs and used only for
/// reconciliation. Once `is_final` is set, recomputing the session's costs
/// requires an explicit override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// The session the collection belongs to.
    pub session_id: String,
    /// The total amount collected.
    pub collected_total: Decimal,
    /// Whether the settlement is final.
    pub is_final: bool,
}

/// Billed-vs-computed detail for one membership row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationLine {
    /// The membership row.
    pub membership_id: String,
    /// The engine's computed cost.
    pub computed: Decimal,
    /// The administrative override, when one exists.
    pub adjusted: Option<Decimal>,
    /// The amount actually billed (adjusted when present, else computed).
    pub billed: Decimal,
}

/// The advisory reconciliation report for a settled session.
///
/// Compares what was billed (adjusted costs where present, computed costs
/// otherwise) against what was collected. Mutates nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// The session being reconciled.
    pub session_id: String,
    /// The sum of billed amounts across all membership rows.
    pub billed_total: Decimal,
    /// The amount actually collected.
    pub collected_total: Decimal,
    /// `collected_total - billed_total`; negative means under-collection.
    pub difference: Decimal,
    /// Per-membership detail, sorted by membership id.
    pub lines: Vec<ReconciliationLine>,
}
