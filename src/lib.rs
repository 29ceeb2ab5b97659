//! Session cost-allocation engine for pay-per-room group venues.
//!
//! This crate computes a deterministic, auditable cost per participant for timed
//! group sessions: given a location's tiered rate table and the timeline of who
//! was present and when, it builds an occupancy timeline, splits it at day/night
//! boundaries, prices each interval, allocates costs across the participants
//! present, and reconciles billed totals against the amount actually collected.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
