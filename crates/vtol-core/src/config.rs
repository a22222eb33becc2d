//! Engine configuration.
//!
//! Every tunable lives here and is passed into the engine explicitly, so a
//! mission can override zones, rates or resolution without touching code.

use crate::error::ConfigError;
use crate::models::RedZone;
use serde::{Deserialize, Serialize};

/// Largest turn-radius buffer, in grid cells, that dilation will run.
pub const MAX_TURN_RADIUS_CELLS: f64 = 200.0;

/// Configuration for one feasibility engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Circular no-fly areas. The planning grid is derived from these.
    pub zones: Vec<RedZone>,
    /// Battery percent consumed per kilometer flown
    pub consumption_rate_per_km: f64,
    /// Battery percent that must remain after the flight (strictly above)
    pub min_battery_threshold: f64,
    /// Minimum turn radius in meters; obstacles are dilated by this much
    pub turn_radius_m: f64,
    /// Edge length of one grid cell in meters
    pub grid_resolution_m: f64,
    /// Extra free space around the zones' bounding box, in meters
    pub grid_margin_m: f64,
    /// Upper bound on allocated grid cells
    pub max_grid_cells: usize,
    /// Upper bound on A* node expansions per request
    pub max_search_steps: usize,
    /// Reject requests whose source or destination lies inside a zone
    pub reject_endpoints_in_zones: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zones: default_zones(),
            consumption_rate_per_km: 0.2,
            min_battery_threshold: 20.0,
            turn_radius_m: 150.0,
            grid_resolution_m: 100.0,
            grid_margin_m: 0.0,
            max_grid_cells: 4_000_000,
            max_search_steps: 5_000_000,
            reject_endpoints_in_zones: false,
        }
    }
}

/// Restricted zones of the reference mission around Jabalpur.
pub fn default_zones() -> Vec<RedZone> {
    vec![
        RedZone::new(23.180167, 80.059333, 5000.0),
        RedZone::new(23.2119185, 79.983639, 3642.0),
        RedZone::new(23.1806835, 79.9774005, 2675.0),
    ]
}

impl EngineConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the scalar settings. Zones are validated by
    /// [`crate::zones::ZoneCatalog::new`] and grid size by
    /// [`crate::grid::OccupancyGrid::build`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.grid_resolution_m.is_finite() || self.grid_resolution_m <= 0.0 {
            return Err(ConfigError::InvalidResolution(self.grid_resolution_m));
        }
        if !self.grid_margin_m.is_finite() || self.grid_margin_m < 0.0 {
            return Err(ConfigError::InvalidMargin(self.grid_margin_m));
        }
        if !self.turn_radius_m.is_finite() || self.turn_radius_m < 0.0 {
            return Err(ConfigError::InvalidTurnRadius(self.turn_radius_m));
        }
        let max_turn_radius_m = MAX_TURN_RADIUS_CELLS * self.grid_resolution_m;
        if self.turn_radius_m > max_turn_radius_m {
            return Err(ConfigError::TurnRadiusTooLarge {
                radius_m: self.turn_radius_m,
                max_m: max_turn_radius_m,
            });
        }
        if !self.consumption_rate_per_km.is_finite() || self.consumption_rate_per_km < 0.0 {
            return Err(ConfigError::InvalidRate(self.consumption_rate_per_km));
        }
        if !self.min_battery_threshold.is_finite()
            || !(0.0..=100.0).contains(&self.min_battery_threshold)
        {
            return Err(ConfigError::InvalidThreshold(self.min_battery_threshold));
        }
        Ok(())
    }
}
