//! Pre-defined feasibility scenarios for demos and smoke tests.

use vtol_core::spatial::to_geo;
use vtol_core::{EngineConfig, FeasibilityRequest, GeoPoint, PlanarPoint, RedZone};

pub const SCENARIO_NAMES: [&str; 3] = ["detour", "hover", "outside"];

/// A named request together with the engine configuration it runs against.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub config: EngineConfig,
    pub request: FeasibilityRequest,
}

pub fn scenario_by_name(name: &str) -> Option<Scenario> {
    match name {
        "detour" => Some(create_detour_scenario()),
        "hover" => Some(create_hover_scenario()),
        "outside" => Some(create_outside_scenario()),
        _ => None,
    }
}

/// Fly west to east across a single 5 km zone.
///
/// The straight line passes through the zone center, so the planner has to
/// go around it. A 2 km margin leaves room to do so.
pub fn create_detour_scenario() -> Scenario {
    let center = GeoPoint::new(23.180167, 80.059333);
    let offset_m = 6500.0;

    Scenario {
        name: "detour",
        description: "west-east crossing of a single 5 km zone",
        config: EngineConfig {
            zones: vec![RedZone {
                center,
                radius_m: 5000.0,
            }],
            grid_margin_m: 2000.0,
            ..EngineConfig::default()
        },
        request: FeasibilityRequest {
            source: to_geo(center, PlanarPoint { x: -offset_m, y: 0.0 }),
            destination: to_geo(center, PlanarPoint { x: offset_m, y: 0.0 }),
            battery: 80.0,
        },
    }
}

/// Source and destination coincide in free space.
pub fn create_hover_scenario() -> Scenario {
    let point = GeoPoint::new(23.16, 79.96);
    Scenario {
        name: "hover",
        description: "source equals destination, reference zones",
        config: EngineConfig::default(),
        request: FeasibilityRequest {
            source: point,
            destination: point,
            battery: 80.0,
        },
    }
}

/// Source lies south of the reference zones' grid and is rejected.
pub fn create_outside_scenario() -> Scenario {
    Scenario {
        name: "outside",
        description: "source outside the planning grid",
        config: EngineConfig::default(),
        request: FeasibilityRequest {
            source: GeoPoint::new(23.0, 80.0),
            destination: GeoPoint::new(23.16, 79.96),
            battery: 80.0,
        },
    }
}
