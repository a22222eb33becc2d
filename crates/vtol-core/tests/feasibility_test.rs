//! End-to-end feasibility scenarios.

use std::sync::Arc;
use vtol_core::spatial::{meters_per_deg_lon, METERS_PER_DEGREE};
use vtol_core::{
    find_path, haversine_distance, path_length_m, ConfigError, EngineConfig, Endpoint,
    FeasibilityEngine, FeasibilityError, FeasibilityOutcome, FeasibilityRequest, GeoPoint,
    InputError, RedZone, RouteAssessment,
};

const ZONE_LAT: f64 = 23.180167;
const ZONE_LON: f64 = 80.059333;

/// One 5 km zone with 2 km of free space around it.
fn single_zone_config() -> EngineConfig {
    EngineConfig {
        zones: vec![RedZone::new(ZONE_LAT, ZONE_LON, 5000.0)],
        grid_resolution_m: 100.0,
        grid_margin_m: 2000.0,
        ..EngineConfig::default()
    }
}

/// Point `east_m` meters east and `north_m` meters north of the zone center.
fn around_zone(east_m: f64, north_m: f64) -> GeoPoint {
    GeoPoint::new(
        ZONE_LAT + north_m / METERS_PER_DEGREE,
        ZONE_LON + east_m / meters_per_deg_lon(ZONE_LAT),
    )
}

fn crossing_request(battery: f64) -> FeasibilityRequest {
    FeasibilityRequest {
        source: around_zone(-6500.0, 0.0),
        destination: around_zone(6500.0, 0.0),
        battery,
    }
}

fn expect_route(outcome: FeasibilityOutcome) -> RouteAssessment {
    match outcome {
        FeasibilityOutcome::Route(route) => route,
        FeasibilityOutcome::NoPath(report) => panic!("expected a route, got {report:?}"),
    }
}

#[test]
fn detours_around_zone_instead_of_crossing() {
    let engine = FeasibilityEngine::new(single_zone_config()).unwrap();
    let request = crossing_request(90.0);
    let straight = haversine_distance(
        request.source.lat,
        request.source.lon,
        request.destination.lat,
        request.destination.lon,
    );
    assert!(straight > 10_000.0);

    let route = expect_route(engine.check(&request).unwrap());
    assert!(route.feasible, "90% battery should cover the detour");
    assert_eq!(route.waypoints.first(), Some(&request.source));
    assert_eq!(route.waypoints.last(), Some(&request.destination));

    // Going around a 5 km circle is clearly longer than going through it.
    assert!(
        route.total_distance > straight * 1.15,
        "path of {:.0} m does not detour (straight {:.0} m)",
        route.total_distance,
        straight
    );

    let max_offset = route
        .waypoints
        .iter()
        .map(|wp| (wp.lat - ZONE_LAT).abs() * METERS_PER_DEGREE)
        .fold(0.0, f64::max);
    assert!(max_offset > 5000.0, "path never leaves the zone's latitude band");

    for wp in &route.waypoints {
        let distance = haversine_distance(ZONE_LAT, ZONE_LON, wp.lat, wp.lon);
        assert!(distance > 4850.0, "waypoint {wp:?} only {distance:.0} m from zone center");
    }

    assert!((route.total_distance - path_length_m(&route.waypoints)).abs() < 1e-6);
    assert!((route.required_battery - route.total_distance / 1000.0 * 0.2).abs() < 1e-9);
    assert!((route.estimated_remaining_battery - (90.0 - route.required_battery)).abs() < 1e-9);
    assert!(route.nodes_visited > 0);
}

#[test]
fn low_battery_reports_metrics_with_negative_verdict() {
    let engine = FeasibilityEngine::new(single_zone_config()).unwrap();
    let route = expect_route(engine.check(&crossing_request(21.0)).unwrap());
    assert!(!route.feasible);
    assert!(route.total_distance > 0.0);
    assert!(route.estimated_remaining_battery < 21.0);

    let json = serde_json::to_value(FeasibilityOutcome::Route(route)).unwrap();
    assert_eq!(json["feasible"], false);
    assert!(json["waypoints"].as_array().is_some_and(|wps| wps.len() > 2));
    assert!(json.get("reason").is_none());
}

#[test]
fn returned_path_is_adjacent_and_free() {
    let engine = FeasibilityEngine::new(EngineConfig {
        grid_margin_m: 2000.0,
        ..EngineConfig::default()
    })
    .unwrap();
    let grid = engine.prepare_grid().unwrap();
    let sw = grid.reference();
    let source = GeoPoint::new(sw.lat + 0.005, sw.lon + 0.005);
    let ne = grid.cell_origin(vtol_core::Cell::new(grid.height() - 1, grid.width() - 1));
    let destination = GeoPoint::new(ne.lat - 0.002, ne.lon - 0.002);

    let start = grid.cell_of(source).unwrap();
    let goal = grid.cell_of(destination).unwrap();
    let path = find_path(&grid, start, goal, 5_000_000).unwrap().unwrap();
    for pair in path.cells.windows(2) {
        assert!(pair[0].is_adjacent(&pair[1]));
    }
    for cell in &path.cells {
        assert!(grid.is_free(*cell), "{cell:?} occupied");
    }

    let outcome = engine
        .check(&FeasibilityRequest {
            source,
            destination,
            battery: 100.0,
        })
        .unwrap();
    let route = expect_route(outcome);
    assert_eq!(route.waypoints.len(), path.cells.len());
}

#[test]
fn source_equals_destination_is_immediate() {
    let engine = FeasibilityEngine::new(EngineConfig::default()).unwrap();
    let point = GeoPoint::new(23.16, 79.96);
    let route = expect_route(
        engine
            .check(&FeasibilityRequest {
                source: point,
                destination: point,
                battery: 80.0,
            })
            .unwrap(),
    );
    assert!(route.feasible);
    assert_eq!(route.total_distance, 0.0);
    assert_eq!(route.required_battery, 0.0);
    assert_eq!(route.estimated_remaining_battery, 80.0);
    assert_eq!(route.waypoints, vec![point]);
    assert_eq!(route.nodes_visited, 1);
}

#[test]
fn endpoint_outside_grid_is_input_error() {
    let engine = FeasibilityEngine::new(EngineConfig::default()).unwrap();
    let inside = GeoPoint::new(23.16, 79.96);
    let outside = GeoPoint::new(23.0, 80.0);

    let err = engine
        .check(&FeasibilityRequest {
            source: outside,
            destination: inside,
            battery: 80.0,
        })
        .unwrap_err();
    assert_eq!(
        err,
        FeasibilityError::Input(InputError::OutOfBounds {
            which: Endpoint::Source,
            lat: 23.0,
            lon: 80.0,
        })
    );

    let err = engine
        .check(&FeasibilityRequest {
            source: inside,
            destination: GeoPoint::new(23.2, 81.0),
            battery: 80.0,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        FeasibilityError::Input(InputError::OutOfBounds {
            which: Endpoint::Destination,
            ..
        })
    ));
}

#[test]
fn sealed_destination_reports_no_path() {
    // Without a margin the buffered zone touches every side of its own grid,
    // cutting the corners off from each other.
    let engine = FeasibilityEngine::new(EngineConfig {
        grid_margin_m: 0.0,
        ..single_zone_config()
    })
    .unwrap();
    let outcome = engine
        .check(&FeasibilityRequest {
            source: around_zone(-4800.0, -4800.0),
            destination: around_zone(4800.0, 4800.0),
            battery: 100.0,
        })
        .unwrap();
    assert_eq!(
        outcome,
        FeasibilityOutcome::NoPath(vtol_core::NoPathReport::default())
    );
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["reason"], "No valid path found");
}

#[test]
fn destination_inside_zone_is_unreachable_by_default() {
    let engine = FeasibilityEngine::new(single_zone_config()).unwrap();
    let outcome = engine
        .check(&FeasibilityRequest {
            source: around_zone(-6500.0, 0.0),
            destination: around_zone(0.0, 0.0),
            battery: 100.0,
        })
        .unwrap();
    assert!(matches!(outcome, FeasibilityOutcome::NoPath(_)));
}

#[test]
fn endpoint_in_zone_rejected_when_enabled() {
    let engine = FeasibilityEngine::new(EngineConfig {
        reject_endpoints_in_zones: true,
        ..single_zone_config()
    })
    .unwrap();
    let err = engine
        .check(&FeasibilityRequest {
            source: around_zone(-6500.0, 0.0),
            destination: around_zone(1000.0, 1000.0),
            battery: 100.0,
        })
        .unwrap_err();
    assert_eq!(
        err,
        FeasibilityError::Input(InputError::EndpointInRestrictedZone {
            which: Endpoint::Destination,
            zone: 0,
        })
    );

    // Points outside every zone still plan normally.
    assert!(engine.check(&crossing_request(90.0)).is_ok());
}

#[test]
fn oversized_grid_fails_fast() {
    let engine = FeasibilityEngine::new(EngineConfig {
        grid_resolution_m: 1.0,
        ..EngineConfig::default()
    })
    .unwrap();
    let point = GeoPoint::new(23.16, 79.96);
    let err = engine
        .check(&FeasibilityRequest {
            source: point,
            destination: point,
            battery: 50.0,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        FeasibilityError::Config(ConfigError::GridTooLarge { max: 4_000_000, .. })
    ));
}

#[test]
fn search_budget_bounds_latency() {
    let engine = FeasibilityEngine::new(EngineConfig {
        max_search_steps: 25,
        ..single_zone_config()
    })
    .unwrap();
    let err = engine.check(&crossing_request(90.0)).unwrap_err();
    assert_eq!(err, FeasibilityError::SearchBudgetExceeded { steps: 25 });
}

#[test]
fn huge_turn_radius_is_rejected_as_config() {
    let err = FeasibilityEngine::new(EngineConfig {
        turn_radius_m: 1.0e8,
        ..EngineConfig::default()
    })
    .unwrap_err();
    assert!(matches!(
        err,
        FeasibilityError::Config(ConfigError::TurnRadiusTooLarge { .. })
    ));
}

#[test]
fn largest_allowed_turn_radius_still_answers() {
    // 200 cells spans the whole default grid at 200 m, so the buffer seals it.
    let engine = FeasibilityEngine::new(EngineConfig {
        turn_radius_m: 40_000.0,
        grid_resolution_m: 200.0,
        ..EngineConfig::default()
    })
    .unwrap();
    let outcome = engine
        .check(&FeasibilityRequest {
            source: GeoPoint::new(23.16, 79.96),
            destination: GeoPoint::new(23.14, 80.1),
            battery: 80.0,
        })
        .unwrap();
    assert!(matches!(outcome, FeasibilityOutcome::NoPath(_)));
}

#[test]
fn zero_search_budget_still_answers_hover() {
    let engine = FeasibilityEngine::new(EngineConfig {
        max_search_steps: 0,
        ..EngineConfig::default()
    })
    .unwrap();
    let point = GeoPoint::new(23.16, 79.96);
    let route = expect_route(
        engine
            .check(&FeasibilityRequest {
                source: point,
                destination: point,
                battery: 80.0,
            })
            .unwrap(),
    );
    assert_eq!(route.waypoints, vec![point]);
    assert_eq!(route.nodes_visited, 1);
}

#[test]
fn shared_engine_is_deterministic_across_threads() {
    let engine = Arc::new(FeasibilityEngine::new(single_zone_config()).unwrap());
    let expected = engine.check(&crossing_request(90.0)).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || engine.check(&crossing_request(90.0)).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn request_round_trips_through_json() {
    let request: FeasibilityRequest = serde_json::from_str(
        r#"{
            "source": { "lat": 23.16, "lon": 79.96 },
            "destination": { "lat": 23.16, "lon": 79.96 },
            "battery": 55
        }"#,
    )
    .unwrap();
    assert_eq!(request.battery, 55.0);

    let engine = FeasibilityEngine::new(EngineConfig::default()).unwrap();
    let json = serde_json::to_value(engine.check(&request).unwrap()).unwrap();
    assert_eq!(json["feasible"], true);
    assert_eq!(json["totalDistance"], 0.0);
    assert_eq!(json["requiredBattery"], 0.0);
    assert_eq!(json["estimatedRemainingBattery"], 55.0);
    assert!(json.get("nodesVisited").is_none());
}
