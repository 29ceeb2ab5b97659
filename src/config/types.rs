//! Configuration file types for rate tables.
//!
//! This module contains the strongly-typed structures that are
//! deserialized from per-location YAML configuration files.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{Location, RateTier};

/// One tier entry in a rate-table file.
#[derive(Debug, Clone, Deserialize)]
pub struct TierEntry {
    /// The smallest group size this tier covers (inclusive).
    pub group_min: u32,
    /// The largest group size this tier covers (inclusive).
    pub group_max: u32,
    /// The hourly day rate.
    pub day_rate: Decimal,
    /// The hourly night rate.
    pub night_rate: Decimal,
}

/// A per-location rate-table configuration file.
///
/// # File format
///
/// ```yaml
/// id: downtown
/// name: Downtown Rooms
/// day_night_cutoff: "18:00:00"
/// tiers:
///   - { group_min: 1, group_max: 3, day_rate: "30", night_rate: "45" }
///   - { group_min: 4, group_max: 5, day_rate: "40", night_rate: "55" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RateTableFile {
    /// Unique identifier for the location.
    pub id: String,
    /// Human-readable name of the location.
    pub name: String,
    /// Optional day/night cutoff; the engine default applies when omitted.
    #[serde(default)]
    pub day_night_cutoff: Option<NaiveTime>,
    /// The rate tiers.
    pub tiers: Vec<TierEntry>,
}

impl From<RateTableFile> for Location {
    fn from(file: RateTableFile) -> Self {
        Location {
            id: file.id,
            name: file.name,
            tiers: file
                .tiers
                .into_iter()
                .map(|t| RateTier {
                    group_min: t.group_min,
                    group_max: t.group_max,
                    day_rate: t.day_rate,
                    night_rate: t.night_rate,
                })
                .collect(),
            day_night_cutoff: file.day_night_cutoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_rate_table_file_deserializes_from_yaml() {
        let yaml = r#"
id: downtown
name: Downtown Rooms
day_night_cutoff: "18:00:00"
tiers:
  - { group_min: 1, group_max: 3, day_rate: "30", night_rate: "45" }
  - { group_min: 4, group_max: 5, day_rate: "40", night_rate: "55" }
"#;

        let file: RateTableFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.id, "downtown");
        assert_eq!(file.tiers.len(), 2);
        assert_eq!(file.tiers[1].day_rate, Decimal::from_str("40").unwrap());
        assert_eq!(
            file.day_night_cutoff,
            NaiveTime::from_hms_opt(18, 0, 0)
        );
    }

    #[test]
    fn test_cutoff_is_optional() {
        let yaml = r#"
id: downtown
name: Downtown Rooms
tiers:
  - { group_min: 1, group_max: 20, day_rate: "30", night_rate: "45" }
"#;

        let file: RateTableFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.day_night_cutoff, None);
    }

    #[test]
    fn test_conversion_to_location() {
        let file = RateTableFile {
            id: "downtown".to_string(),
            name: "Downtown Rooms".to_string(),
            day_night_cutoff: None,
            tiers: vec![TierEntry {
                group_min: 1,
                group_max: 3,
                day_rate: Decimal::from_str("30").unwrap(),
                night_rate: Decimal::from_str("45").unwrap(),
            }],
        };

        let location: Location = file.into();
        assert_eq!(location.id, "downtown");
        assert_eq!(location.max_group_size(), 3);
        assert!(location.validate().is_ok());
    }
}
