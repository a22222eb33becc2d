//! Error types for the feasibility engine.
//!
//! Geometric and energy infeasibility are not errors: they come back as a
//! [`crate::models::FeasibilityOutcome`]. Everything here is a rejected
//! request or a configuration that cannot produce a usable grid.

use thiserror::Error;

/// Which end of the requested flight a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Destination,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Source => write!(f, "source"),
            Endpoint::Destination => write!(f, "destination"),
        }
    }
}

/// The request itself is malformed or cannot be placed on the grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{which} coordinates must be finite (lat={lat}, lon={lon})")]
    NonFiniteCoordinate { which: Endpoint, lat: f64, lon: f64 },

    #[error("{which} latitude {lat} is outside [-90, 90]")]
    LatitudeOutOfRange { which: Endpoint, lat: f64 },

    #[error("{which} longitude {lon} is outside [-180, 180]")]
    LongitudeOutOfRange { which: Endpoint, lon: f64 },

    #[error("battery level {0} must be a finite percentage in [0, 100]")]
    InvalidBattery(f64),

    #[error("{which} ({lat}, {lon}) lies outside the planning grid")]
    OutOfBounds { which: Endpoint, lat: f64, lon: f64 },

    #[error("{which} lies inside restricted zone #{zone}")]
    EndpointInRestrictedZone { which: Endpoint, zone: usize },
}

/// The engine configuration cannot produce a usable grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("no restricted zones configured; the planning grid is derived from them")]
    NoZones,

    #[error("restricted zone #{index} is invalid: {reason}")]
    InvalidZone { index: usize, reason: String },

    #[error("grid resolution must be a positive finite number of meters (got {0})")]
    InvalidResolution(f64),

    #[error("grid margin must be a non-negative finite number of meters (got {0})")]
    InvalidMargin(f64),

    #[error("turn radius must be a non-negative finite number of meters (got {0})")]
    InvalidTurnRadius(f64),

    #[error("turn radius of {radius_m} m exceeds the buffer limit of {max_m} m at this resolution")]
    TurnRadiusTooLarge { radius_m: f64, max_m: f64 },

    #[error("battery consumption rate must be a non-negative finite %/km (got {0})")]
    InvalidRate(f64),

    #[error("minimum battery threshold must be a finite percentage in [0, 100] (got {0})")]
    InvalidThreshold(f64),

    #[error("grid degenerates to {width}x{height} cells at this resolution")]
    DegenerateGrid { width: usize, height: usize },

    #[error("grid needs {cells} cells which exceeds the limit of {max}")]
    GridTooLarge { cells: u128, max: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeasibilityError {
    #[error("invalid request: {0}")]
    Input(#[from] InputError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("path search exceeded its budget of {steps} expansions")]
    SearchBudgetExceeded { steps: usize },
}

pub type Result<T, E = FeasibilityError> = std::result::Result<T, E>;
