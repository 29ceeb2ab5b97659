//! Rate-table loading functionality.
//!
//! This module provides the [`RateTableLoader`] type for loading
//! per-location rate tables from YAML files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::Location;

use super::types::RateTableFile;

/// Loads and provides access to per-location rate tables.
///
/// The `RateTableLoader` reads every YAML file in a directory, validates
/// each location's tier-partition invariant, and indexes the result by
/// location id. A gapped or overlapping table is rejected at load time,
/// before any session can be priced against it.
///
/// # Directory Structure
///
/// ```text
/// config/locations/
/// ├── downtown.yaml
/// └── riverside.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use session_billing_engine::config::RateTableLoader;
///
/// let loader = RateTableLoader::load("./config/locations").unwrap();
/// let location = loader.get("downtown").unwrap();
/// println!("Max group size: {}", location.max_group_size());
/// ```
#[derive(Debug, Clone)]
pub struct RateTableLoader {
    locations: HashMap<String, Location>,
}

impl RateTableLoader {
    /// Loads all rate tables from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/locations")
    ///
    /// # Returns
    ///
    /// Returns a `RateTableLoader` instance on success, or an error if:
    /// - The directory is missing or contains no YAML files
    /// - Any file contains invalid YAML
    /// - Any location's rate table violates the tier-partition invariant
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let dir = path.as_ref();
        let dir_str = dir.display().to_string();

        if !dir.exists() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut locations = HashMap::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let file = Self::load_yaml(&path)?;
                let location: Location = file.into();
                location.validate()?;
                locations.insert(location.id.clone(), location);
            }
        }

        if locations.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate table files found)", dir_str),
            });
        }

        info!(locations = locations.len(), "Loaded rate tables");
        Ok(Self { locations })
    }

    /// Loads and parses a YAML rate-table file.
    fn load_yaml(path: &Path) -> EngineResult<RateTableFile> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParse {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Gets a location's rate table by id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] when no rate table was loaded
    /// for the id.
    pub fn get(&self, location_id: &str) -> EngineResult<&Location> {
        self.locations
            .get(location_id)
            .ok_or_else(|| EngineError::Configuration {
                location_id: location_id.to_string(),
                message: "no rate table loaded for this location".to_string(),
            })
    }

    /// Returns all loaded locations, indexed by id.
    pub fn locations(&self) -> &HashMap<String, Location> {
        &self.locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_config_directory() {
        let loader = RateTableLoader::load("./config/locations").unwrap();
        assert!(!loader.locations().is_empty());

        let downtown = loader.get("downtown").unwrap();
        assert_eq!(downtown.max_group_size(), 20);
        assert!(downtown.validate().is_ok());
    }

    #[test]
    fn test_missing_directory_errors() {
        let err = RateTableLoader::load("./config/does-not-exist").unwrap_err();
        assert!(matches!(err, EngineError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_unknown_location_errors() {
        let loader = RateTableLoader::load("./config/locations").unwrap();
        let err = loader.get("nowhere").unwrap_err();
        match err {
            EngineError::Configuration { location_id, .. } => {
                assert_eq!(location_id, "nowhere");
            }
            other => panic!("expected Configuration, got {other:?}"),
        }
    }
}
