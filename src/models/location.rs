//! Location model and rate table types.
//!
//! This module defines the Location and RateTier structs that describe a
//! venue and its group-size pricing. A location's rate table is an ordered
//! set of tiers, each mapping a contiguous occupancy range to an hourly day
//! rate and night rate.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The default day/night cutoff hour used when a location does not
/// configure its own: 18:00.
pub const DEFAULT_DAY_NIGHT_CUTOFF: NaiveTime = match NaiveTime::from_hms_opt(18, 0, 0) {
    Some(t) => t,
    None => panic!("18:00 is a valid time of day"),
};

/// A group-size pricing tier.
///
/// Each tier covers a contiguous range of occupancy counts and carries an
/// hourly rate for the day side and the night side of the cutoff.
///
/// # Example
///
/// ```
/// use session_billing_engine::models::RateTier;
/// use rust_decimal::Decimal;
///
/// let tier = RateTier {
///     group_min: 1,
///     group_max: 3,
///     day_rate: Decimal::new(30, 0),
///     night_rate: Decimal::new(45, 0),
/// };
/// assert!(tier.covers(2));
/// assert!(!tier.covers(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTier {
    /// The smallest group size this tier covers (inclusive).
    pub group_min: u32,
    /// The largest group size this tier covers (inclusive).
    pub group_max: u32,
    /// The hourly rate before the day/night cutoff, in currency units.
    pub day_rate: Decimal,
    /// The hourly rate after the day/night cutoff, in currency units.
    pub night_rate: Decimal,
}

impl RateTier {
    /// Returns true when the given occupancy falls within this tier.
    pub fn covers(&self, occupancy: u32) -> bool {
        occupancy >= self.group_min && occupancy <= self.group_max
    }
}

/// A venue location with its rate table and day/night cutoff.
///
/// The rate table must partition the range `[1, max_group_size]` with no
/// gaps and no overlaps; [`Location::validate`] enforces this and is called
/// by the configuration loader and by the engine before any computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique identifier for the location.
    pub id: String,
    /// Human-readable name of the location.
    pub name: String,
    /// The rate tiers, sorted by `group_min` ascending.
    pub tiers: Vec<RateTier>,
    /// The hour of day at which day rates give way to night rates.
    /// `None` means the engine default applies.
    #[serde(default)]
    pub day_night_cutoff: Option<NaiveTime>,
}

impl Location {
    /// Returns the largest group size covered by any tier, or 0 when the
    /// rate table is empty.
    pub fn max_group_size(&self) -> u32 {
        self.tiers.iter().map(|t| t.group_max).max().unwrap_or(0)
    }

    /// Returns the cutoff configured for this location, or the default.
    pub fn effective_cutoff(&self) -> NaiveTime {
        self.day_night_cutoff.unwrap_or(DEFAULT_DAY_NIGHT_CUTOFF)
    }

    /// Validates the rate table invariant.
    ///
    /// The tiers, sorted by `group_min`, must start at 1 and form a
    /// contiguous partition with `group_min <= group_max` and non-negative
    /// rates throughout.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] naming the first violation
    /// found: an empty table, a tier with inverted bounds, a negative rate,
    /// or a gap/overlap between consecutive tiers.
    pub fn validate(&self) -> EngineResult<()> {
        if self.tiers.is_empty() {
            return Err(self.config_error("rate table has no tiers"));
        }

        let mut sorted: Vec<&RateTier> = self.tiers.iter().collect();
        sorted.sort_by_key(|t| t.group_min);

        if sorted[0].group_min != 1 {
            return Err(self.config_error(format!(
                "first tier starts at group size {}, expected 1",
                sorted[0].group_min
            )));
        }

        let mut expected_min = 1u32;
        for tier in sorted {
            if tier.group_min != expected_min {
                return Err(self.config_error(format!(
                    "tier starting at {} leaves group sizes {}..{} uncovered or overlapping",
                    tier.group_min,
                    expected_min.min(tier.group_min),
                    tier.group_min.max(expected_min) - 1
                )));
            }
            if tier.group_min > tier.group_max {
                return Err(self.config_error(format!(
                    "tier {}-{} has group_min greater than group_max",
                    tier.group_min, tier.group_max
                )));
            }
            if tier.day_rate < Decimal::ZERO || tier.night_rate < Decimal::ZERO {
                return Err(self.config_error(format!(
                    "tier {}-{} has a negative rate",
                    tier.group_min, tier.group_max
                )));
            }
            expected_min = tier.group_max + 1;
        }

        Ok(())
    }

    fn config_error(&self, message: impl Into<String>) -> EngineError {
        EngineError::Configuration {
            location_id: self.id.clone(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(min: u32, max: u32, day: i64, night: i64) -> RateTier {
        RateTier {
            group_min: min,
            group_max: max,
            day_rate: Decimal::new(day, 0),
            night_rate: Decimal::new(night, 0),
        }
    }

    fn make_location(tiers: Vec<RateTier>) -> Location {
        Location {
            id: "downtown".to_string(),
            name: "Downtown Rooms".to_string(),
            tiers,
            day_night_cutoff: None,
        }
    }

    /// LT-001: contiguous table validates
    #[test]
    fn test_contiguous_table_validates() {
        let location = make_location(vec![
            tier(1, 3, 30, 45),
            tier(4, 5, 40, 55),
            tier(6, 8, 50, 65),
        ]);
        assert!(location.validate().is_ok());
        assert_eq!(location.max_group_size(), 8);
    }

    /// LT-002: gap between tiers is rejected
    #[test]
    fn test_gap_between_tiers_rejected() {
        let location = make_location(vec![tier(1, 3, 30, 45), tier(5, 8, 50, 65)]);
        let err = location.validate().unwrap_err();
        assert!(err.to_string().contains("downtown"));
    }

    /// LT-003: overlapping tiers are rejected
    #[test]
    fn test_overlapping_tiers_rejected() {
        let location = make_location(vec![tier(1, 4, 30, 45), tier(4, 8, 50, 65)]);
        assert!(location.validate().is_err());
    }

    /// LT-004: table not starting at 1 is rejected
    #[test]
    fn test_table_not_starting_at_one_rejected() {
        let location = make_location(vec![tier(2, 5, 30, 45)]);
        let err = location.validate().unwrap_err();
        assert!(err.to_string().contains("expected 1"));
    }

    /// LT-005: inverted tier bounds are rejected
    #[test]
    fn test_inverted_tier_bounds_rejected() {
        let mut location = make_location(vec![tier(1, 3, 30, 45)]);
        location.tiers[0].group_max = 0;
        assert!(location.validate().is_err());
    }

    /// LT-006: negative rate is rejected
    #[test]
    fn test_negative_rate_rejected() {
        let location = make_location(vec![RateTier {
            group_min: 1,
            group_max: 3,
            day_rate: Decimal::new(-30, 0),
            night_rate: Decimal::new(45, 0),
        }]);
        let err = location.validate().unwrap_err();
        assert!(err.to_string().contains("negative rate"));
    }

    /// LT-007: empty table is rejected
    #[test]
    fn test_empty_table_rejected() {
        let location = make_location(vec![]);
        let err = location.validate().unwrap_err();
        assert!(err.to_string().contains("no tiers"));
    }

    #[test]
    fn test_tiers_validate_out_of_order() {
        // Validation sorts by group_min, so storage order does not matter
        let location = make_location(vec![tier(4, 5, 40, 55), tier(1, 3, 30, 45)]);
        assert!(location.validate().is_ok());
    }

    #[test]
    fn test_covers() {
        let t = tier(4, 5, 40, 55);
        assert!(!t.covers(3));
        assert!(t.covers(4));
        assert!(t.covers(5));
        assert!(!t.covers(6));
    }

    #[test]
    fn test_effective_cutoff_default() {
        let location = make_location(vec![tier(1, 3, 30, 45)]);
        assert_eq!(
            location.effective_cutoff(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_effective_cutoff_override() {
        let mut location = make_location(vec![tier(1, 3, 30, 45)]);
        location.day_night_cutoff = NaiveTime::from_hms_opt(20, 0, 0);
        assert_eq!(
            location.effective_cutoff(),
            NaiveTime::from_hms_opt(20, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_location_serialization() {
        let location = make_location(vec![tier(1, 3, 30, 45)]);
        let json = serde_json::to_string(&location).unwrap();
        let deserialized: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(location, deserialized);
    }
}
