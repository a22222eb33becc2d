//! Spatial math: local planar projection and distances.
//!
//! The planar frame is an equirectangular approximation anchored at a
//! reference point. It is accurate over regional extents (tens of km) and
//! points projected against different references must never be mixed.

use crate::models::{GeoPoint, PlanarPoint};

/// Meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Project `point` into the planar frame anchored at `reference`.
pub fn to_planar(reference: GeoPoint, point: GeoPoint) -> PlanarPoint {
    PlanarPoint {
        x: (point.lon - reference.lon) * meters_per_deg_lon(reference.lat),
        y: (point.lat - reference.lat) * METERS_PER_DEGREE,
    }
}

/// Inverse of [`to_planar`] for the same `reference`.
pub fn to_geo(reference: GeoPoint, planar: PlanarPoint) -> GeoPoint {
    GeoPoint {
        lat: reference.lat + planar.y / METERS_PER_DEGREE,
        lon: reference.lon + planar.x / meters_per_deg_lon(reference.lat),
    }
}

/// Meters per degree of longitude at `lat_deg`.
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    METERS_PER_DEGREE * lat_deg.to_radians().cos()
}

/// Planar length of one leg, scaling longitude at the midpoint latitude.
pub fn leg_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let mid_lat = (a.lat + b.lat) / 2.0;
    let dx = (b.lon - a.lon) * meters_per_deg_lon(mid_lat);
    let dy = (b.lat - a.lat) * METERS_PER_DEGREE;
    (dx * dx + dy * dy).sqrt()
}

/// Sum of leg distances along `points`. Zero for fewer than two points.
pub fn path_length_m(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|leg| leg_distance_m(leg[0], leg[1]))
        .sum()
}

/// Great-circle distance in meters between two points (Haversine formula).
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}
