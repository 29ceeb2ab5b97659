//! Settlement reconciliation.
//!
//! This module compares what a session was billed — adjusted costs where an
//! admin override exists, computed costs otherwise — against the amount
//! actually collected, and reports the signed difference. Pure and
//! advisory; nothing is mutated.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AdjustedCost, MembershipCost, ReconciliationLine, ReconciliationReport, Session,
    SettlementRecord,
};

/// Builds the reconciliation report for a finalized session.
///
/// # Arguments
///
/// * `session` - The session being reconciled; must have an end time
/// * `costs` - The finalized computed costs, one per membership row
/// * `adjustments` - Administrative overrides, at most one per membership
/// * `settlement` - The amount actually collected for the session
///
/// # Errors
///
/// Returns [`EngineError::NotEnded`] when the session has no end time yet.
///
/// # Example
///
/// ```
/// use session_billing_engine::calculation::reconcile;
/// use session_billing_engine::models::{MembershipCost, Session, SettlementRecord};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let parse = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let session = Session {
///     id: "session_001".to_string(),
///     location_id: "downtown".to_string(),
///     start_time: parse("2025-03-01 14:00:00"),
///     end_time: Some(parse("2025-03-01 16:00:00")),
///     day_night_cutoff: None,
/// };
/// let costs = vec![MembershipCost {
///     membership_id: "m_001".to_string(),
///     participant_id: "p_001".to_string(),
///     amount: Decimal::from_str("60.00").unwrap(),
/// }];
/// let settlement = SettlementRecord {
///     session_id: "session_001".to_string(),
///     collected_total: Decimal::from_str("55.00").unwrap(),
///     is_final: false,
/// };
///
/// let report = reconcile(&session, &costs, &[], &settlement).unwrap();
/// assert_eq!(report.difference, Decimal::from_str("-5.00").unwrap());
/// ```
pub fn reconcile(
    session: &Session,
    costs: &[MembershipCost],
    adjustments: &[AdjustedCost],
    settlement: &SettlementRecord,
) -> EngineResult<ReconciliationReport> {
    if !session.is_ended() {
        return Err(EngineError::NotEnded {
            session_id: session.id.clone(),
        });
    }

    let overrides: HashMap<&str, Decimal> = adjustments
        .iter()
        .map(|a| (a.membership_id.as_str(), a.amount))
        .collect();

    let mut lines: Vec<ReconciliationLine> = costs
        .iter()
        .map(|cost| {
            let adjusted = overrides.get(cost.membership_id.as_str()).copied();
            ReconciliationLine {
                membership_id: cost.membership_id.clone(),
                computed: cost.amount,
                adjusted,
                billed: adjusted.unwrap_or(cost.amount),
            }
        })
        .collect();
    lines.sort_by(|a, b| a.membership_id.cmp(&b.membership_id));

    let billed_total: Decimal = lines.iter().map(|l| l.billed).sum();

    Ok(ReconciliationReport {
        session_id: session.id.clone(),
        billed_total,
        collected_total: settlement.collected_total,
        difference: settlement.collected_total - billed_total,
        lines,
    })
}
