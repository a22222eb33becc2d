//! Core data models for feasibility requests and results.

use serde::{Deserialize, Serialize};

/// Reason reported when no connected free path exists.
pub const NO_PATH_REASON: &str = "No valid path found";

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// A position in meters east (`x`) and north (`y`) of a reference point.
///
/// Only meaningful together with the reference it was projected against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

/// A circular no-fly area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedZone {
    pub center: GeoPoint,
    /// Radius in meters
    #[serde(rename = "radius", alias = "radius_m")]
    pub radius_m: f64,
}

impl RedZone {
    pub fn new(lat: f64, lon: f64, radius_m: f64) -> Self {
        Self {
            center: GeoPoint::new(lat, lon),
            radius_m,
        }
    }
}

/// A feasibility question from the calling layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityRequest {
    pub source: GeoPoint,
    pub destination: GeoPoint,
    /// State of charge in percent (0-100)
    pub battery: f64,
}

/// Metrics for a geometrically valid path.
///
/// `feasible` is false when the battery does not cover the path plus the
/// safety threshold; the metrics are still reported so callers can show
/// the margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteAssessment {
    pub feasible: bool,
    /// Path length in meters
    pub total_distance: f64,
    /// Battery percent consumed by the path
    pub required_battery: f64,
    pub estimated_remaining_battery: f64,
    pub waypoints: Vec<GeoPoint>,
    /// Search expansions; logged, not part of the response body
    #[serde(default, skip_serializing)]
    pub nodes_visited: usize,
}

/// Reported when source and destination are not connected on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoPathReport {
    pub feasible: bool,
    pub reason: String,
}

impl Default for NoPathReport {
    fn default() -> Self {
        Self {
            feasible: false,
            reason: NO_PATH_REASON.to_string(),
        }
    }
}

/// Result of a feasibility check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeasibilityOutcome {
    Route(RouteAssessment),
    NoPath(NoPathReport),
}

impl FeasibilityOutcome {
    pub fn is_feasible(&self) -> bool {
        match self {
            FeasibilityOutcome::Route(route) => route.feasible,
            FeasibilityOutcome::NoPath(_) => false,
        }
    }

    pub fn route(&self) -> Option<&RouteAssessment> {
        match self {
            FeasibilityOutcome::Route(route) => Some(route),
            FeasibilityOutcome::NoPath(_) => None,
        }
    }
}
