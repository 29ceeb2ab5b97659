//! Domain models for the session cost-allocation engine.

mod allocation_result;
mod location;
mod membership;
mod session;

pub use allocation_result::{
    AdjustedCost, AllocationResult, CostLine, CostTotals, MembershipCost, ReconciliationLine,
    ReconciliationReport, SettlementRecord,
};
pub use location::{DEFAULT_DAY_NIGHT_CUTOFF, Location, RateTier};
pub use membership::Membership;
pub use session::Session;
