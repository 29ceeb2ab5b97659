//! Calculation logic for the session cost-allocation engine.
//!
//! This module contains the pipeline that turns membership rows into
//! per-membership costs: occupancy timeline construction, day/night
//! splitting, tier and rate resolution, cost allocation with deterministic
//! rounding, finalization orchestration, and settlement reconciliation.

mod allocation;
mod day_night;
mod finalize;
mod reconcile;
mod tier;
mod timeline;

pub use allocation::{AllocationOutcome, allocate};
pub use day_night::{DaySide, TimelineSegment, side_of, split_by_side};
pub use finalize::{SessionFinalizer, compute_costs, preview_costs};
pub use reconcile::reconcile;
pub use tier::{ResolvedRate, resolve_rate};
pub use timeline::{OccupancyInterval, build_timeline};
