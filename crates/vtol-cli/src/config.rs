//! CLI configuration from environment.

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;
use vtol_core::EngineConfig;

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// JSON file holding an `EngineConfig`; defaults apply when unset
    pub engine_config_path: Option<PathBuf>,
    pub log_json: bool,
    pub resolution_m: Option<f64>,
    pub turn_radius_m: Option<f64>,
    pub consumption_rate_per_km: Option<f64>,
    pub min_battery_threshold: Option<f64>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable numbers are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str| lookup(key).and_then(|s| s.trim().parse::<f64>().ok());
        Self {
            engine_config_path: lookup("VTOL_CONFIG")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            log_json: lookup("VTOL_LOG_JSON")
                .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            resolution_m: number("VTOL_RESOLUTION_M"),
            turn_radius_m: number("VTOL_TURN_RADIUS_M"),
            consumption_rate_per_km: number("VTOL_CONSUMPTION_RATE"),
            min_battery_threshold: number("VTOL_MIN_BATTERY"),
        }
    }

    /// Load the engine configuration file (if any) and apply overrides.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let base = match &self.engine_config_path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading engine config {}", path.display()))?;
                EngineConfig::from_json(&raw)
                    .with_context(|| format!("parsing engine config {}", path.display()))?
            }
            None => EngineConfig::default(),
        };
        Ok(self.apply_overrides(base))
    }

    pub fn apply_overrides(&self, mut config: EngineConfig) -> EngineConfig {
        if let Some(value) = self.resolution_m {
            config.grid_resolution_m = value;
        }
        if let Some(value) = self.turn_radius_m {
            config.turn_radius_m = value;
        }
        if let Some(value) = self.consumption_rate_per_km {
            config.consumption_rate_per_km = value;
        }
        if let Some(value) = self.min_battery_threshold {
            config.min_battery_threshold = value;
        }
        config
    }
}
