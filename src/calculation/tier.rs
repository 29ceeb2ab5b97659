//! Rate tier resolution.
//!
//! This module maps an occupancy count to the rate tier covering it and
//! picks the day or night rate for a timeline segment. Uncovered occupancy
//! counts are a configuration gap and fail hard; they are never clamped to
//! the nearest tier.

use rust_decimal::Decimal;

use super::day_night::DaySide;
use crate::error::{EngineError, EngineResult};
use crate::models::Location;

/// The rate selected for a segment, with the tier bounds that justify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRate {
    /// The lower bound of the matched tier.
    pub tier_min: u32,
    /// The upper bound of the matched tier.
    pub tier_max: u32,
    /// The hourly rate for the requested side.
    pub rate: Decimal,
}

/// Resolves the hourly rate for an occupancy count on one side of the cutoff.
///
/// # Arguments
///
/// * `location` - The location whose rate table applies
/// * `occupancy` - The number of memberships present; must be at least 1
/// * `side` - Which side of the day/night cutoff the segment falls on
///
/// # Errors
///
/// Returns [`EngineError::Configuration`] when `occupancy` is 0 (no tier
/// applies; callers must skip empty segments instead) or when no tier
/// covers the count. An uncovered group size must be corrected in the rate
/// table, not silently absorbed.
///
/// # Example
///
/// ```
/// use session_billing_engine::calculation::{DaySide, resolve_rate};
/// use session_billing_engine::models::{Location, RateTier};
/// use rust_decimal::Decimal;
///
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
///
/// let resolved = resolve_rate(&location, 2, DaySide::Night).unwrap();
/// assert_eq!(resolved.rate, Decimal::new(45, 0));
/// assert_eq!((resolved.tier_min, resolved.tier_max), (1, 3));
/// ```
pub fn resolve_rate(
    location: &Location,
    occupancy: u32,
    side: DaySide,
) -> EngineResult<ResolvedRate> {
    if occupancy == 0 {
        return Err(EngineError::Configuration {
            location_id: location.id.clone(),
            message: "no tier applies to occupancy 0; empty intervals must be skipped".to_string(),
        });
    }

    let tier = location
        .tiers
        .iter()
        .find(|t| t.covers(occupancy))
        .ok_or_else(|| EngineError::Configuration {
            location_id: location.id.clone(),
            message: format!(
                "no tier covers occupancy {} (maximum covered group size is {})",
                occupancy,
                location.max_group_size()
            ),
        })?;

    let rate = match side {
        DaySide::Day => tier.day_rate,
        DaySide::Night => tier.night_rate,
    };

    Ok(ResolvedRate {
        tier_min: tier.group_min,
        tier_max: tier.group_max,
        rate,
    })
}
