//! Rate-table configuration for the cost-allocation engine.
//!
//! This module provides loading of per-location rate tables from YAML
//! files, with the tier-partition invariant validated at load time.

mod loader;
mod types;

pub use loader::RateTableLoader;
pub use types::{RateTableFile, TierEntry};
