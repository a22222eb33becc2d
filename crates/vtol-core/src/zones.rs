//! Configured restricted zones.

use crate::error::ConfigError;
use crate::models::{GeoPoint, RedZone};
use crate::spatial::{haversine_distance, meters_per_deg_lon, METERS_PER_DEGREE};

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    pub fn south_west(&self) -> GeoPoint {
        GeoPoint::new(self.min_lat, self.min_lon)
    }

    pub fn north_east(&self) -> GeoPoint {
        GeoPoint::new(self.max_lat, self.max_lon)
    }
}

/// A validated, non-empty, read-only list of restricted zones.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCatalog {
    zones: Vec<RedZone>,
}

impl ZoneCatalog {
    pub fn new(zones: Vec<RedZone>) -> Result<Self, ConfigError> {
        if zones.is_empty() {
            return Err(ConfigError::NoZones);
        }
        for (index, zone) in zones.iter().enumerate() {
            let errors = validate_zone(zone);
            if !errors.is_empty() {
                return Err(ConfigError::InvalidZone {
                    index,
                    reason: errors.join("; "),
                });
            }
        }
        Ok(Self { zones })
    }

    pub fn zones(&self) -> &[RedZone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Box containing every zone's center ± (radius + `margin_m`).
    pub fn bounds(&self, margin_m: f64) -> GeoBounds {
        let mut bounds = GeoBounds {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for zone in &self.zones {
            let reach_m = zone.radius_m + margin_m;
            let dlat = reach_m / METERS_PER_DEGREE;
            let dlon = reach_m / meters_per_deg_lon(zone.center.lat);
            bounds.min_lat = bounds.min_lat.min(zone.center.lat - dlat);
            bounds.max_lat = bounds.max_lat.max(zone.center.lat + dlat);
            bounds.min_lon = bounds.min_lon.min(zone.center.lon - dlon);
            bounds.max_lon = bounds.max_lon.max(zone.center.lon + dlon);
        }
        bounds
    }

    /// Index of the first zone whose true (great-circle) radius covers `point`.
    pub fn zone_containing(&self, point: GeoPoint) -> Option<usize> {
        self.zones.iter().position(|zone| {
            haversine_distance(zone.center.lat, zone.center.lon, point.lat, point.lon)
                <= zone.radius_m
        })
    }
}

/// Returns list of validation errors (empty = valid).
fn validate_zone(zone: &RedZone) -> Vec<String> {
    let mut errors = Vec::new();
    if !zone.center.is_finite() {
        errors.push("center must be finite".to_string());
    } else {
        if !(-90.0..=90.0).contains(&zone.center.lat) {
            errors.push(format!("center latitude {} outside [-90, 90]", zone.center.lat));
        }
        // Keep clear of the poles so the longitude scale stays positive.
        if zone.center.lat.abs() >= 89.0 {
            errors.push("center too close to a pole for planar projection".to_string());
        }
        if !(-180.0..=180.0).contains(&zone.center.lon) {
            errors.push(format!("center longitude {} outside [-180, 180]", zone.center.lon));
        }
    }
    if !zone.radius_m.is_finite() || zone.radius_m <= 0.0 {
        errors.push(format!("radius {} must be a positive number of meters", zone.radius_m));
    }
    errors
}
