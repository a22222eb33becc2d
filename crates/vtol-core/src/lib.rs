//! Geofenced flight-feasibility engine.
//!
//! Given a source, a destination and a battery level, decide whether a
//! vehicle can fly between them around fixed circular restricted zones while
//! keeping its minimum turn radius clear, and report the waypoint path and
//! energy estimate.

pub mod config;
pub mod error;
pub mod feasibility;
pub mod grid;
pub mod models;
pub mod raster;
pub mod search;
pub mod spatial;
pub mod zones;

pub use config::{default_zones, EngineConfig};
pub use error::{ConfigError, Endpoint, FeasibilityError, InputError};
pub use feasibility::{evaluate, FeasibilityEngine};
pub use grid::{Cell, OccupancyGrid};
pub use models::{
    FeasibilityOutcome, FeasibilityRequest, GeoPoint, NoPathReport, PlanarPoint, RedZone,
    RouteAssessment, NO_PATH_REASON,
};
pub use raster::{dilate, mark_zones};
pub use search::{find_path, GridPath};
pub use spatial::{haversine_distance, leg_distance_m, path_length_m, to_geo, to_planar};
pub use zones::{GeoBounds, ZoneCatalog};
