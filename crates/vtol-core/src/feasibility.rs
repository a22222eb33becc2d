//! Flight feasibility: grid preparation, search and energy check.

use crate::config::EngineConfig;
use crate::error::{Endpoint, FeasibilityError, InputError, Result};
use crate::grid::{Cell, OccupancyGrid};
use crate::models::{
    FeasibilityOutcome, FeasibilityRequest, GeoPoint, NoPathReport, RouteAssessment,
};
use crate::raster::{dilate, mark_zones};
use crate::search::find_path;
use crate::spatial::path_length_m;
use crate::zones::ZoneCatalog;
use tracing::{debug, info, info_span, warn};

/// Distance, energy and verdict for a waypoint sequence.
///
/// `feasible` requires the remaining battery to stay strictly above
/// `min_battery_threshold`. The remaining estimate is reported either way.
pub fn evaluate(waypoints: Vec<GeoPoint>, battery: f64, config: &EngineConfig) -> RouteAssessment {
    let total_distance = path_length_m(&waypoints);
    let required_battery = (total_distance / 1000.0) * config.consumption_rate_per_km;
    let remaining = battery - required_battery;

    RouteAssessment {
        feasible: remaining > config.min_battery_threshold,
        total_distance,
        required_battery,
        estimated_remaining_battery: remaining,
        waypoints,
        nodes_visited: 0,
    }
}

/// Stateless feasibility checker over a fixed zone configuration.
///
/// Every call builds its own grid, so one engine can be shared across
/// threads without locking.
#[derive(Debug, Clone)]
pub struct FeasibilityEngine {
    config: EngineConfig,
    catalog: ZoneCatalog,
}

impl FeasibilityEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let catalog = ZoneCatalog::new(config.zones.clone())?;
        Ok(Self { config, catalog })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ZoneCatalog {
        &self.catalog
    }

    /// Grid with zones rasterized and buffered by the turn radius.
    pub fn prepare_grid(&self) -> Result<OccupancyGrid> {
        let mut grid = OccupancyGrid::build(
            &self.catalog,
            self.config.grid_resolution_m,
            self.config.grid_margin_m,
            self.config.max_grid_cells,
        )?;
        let zone_cells = mark_zones(&mut grid, &self.catalog);
        let buffer_cells = dilate(&mut grid, self.config.turn_radius_m);
        debug!(
            width = grid.width(),
            height = grid.height(),
            zone_cells,
            buffer_cells,
            "prepared search grid"
        );
        Ok(grid)
    }

    pub fn check(&self, request: &FeasibilityRequest) -> Result<FeasibilityOutcome> {
        let span = info_span!(
            "feasibility_check",
            src_lat = request.source.lat,
            src_lon = request.source.lon,
            dst_lat = request.destination.lat,
            dst_lon = request.destination.lon,
            battery = request.battery
        );
        let _guard = span.enter();

        if let Err(err) = self.validate_request(request) {
            warn!(error = %err, "rejected feasibility request");
            return Err(err.into());
        }

        let grid = self.prepare_grid()?;
        let start = locate(&grid, request.source, Endpoint::Source)?;
        let goal = locate(&grid, request.destination, Endpoint::Destination)?;

        let Some(path) = find_path(&grid, start, goal, self.config.max_search_steps)? else {
            info!("no valid path between source and destination");
            return Ok(FeasibilityOutcome::NoPath(NoPathReport::default()));
        };

        let waypoints = to_waypoints(&grid, &path.cells, request.source, request.destination);
        let mut assessment = evaluate(waypoints, request.battery, &self.config);
        assessment.nodes_visited = path.nodes_visited;

        info!(
            feasible = assessment.feasible,
            total_distance_m = assessment.total_distance,
            required_battery = assessment.required_battery,
            remaining_battery = assessment.estimated_remaining_battery,
            waypoints = assessment.waypoints.len(),
            nodes_visited = assessment.nodes_visited,
            "feasibility evaluated"
        );
        Ok(FeasibilityOutcome::Route(assessment))
    }

    fn validate_request(&self, request: &FeasibilityRequest) -> Result<(), InputError> {
        validate_point(request.source, Endpoint::Source)?;
        validate_point(request.destination, Endpoint::Destination)?;
        if !request.battery.is_finite() || !(0.0..=100.0).contains(&request.battery) {
            return Err(InputError::InvalidBattery(request.battery));
        }
        if self.config.reject_endpoints_in_zones {
            for (which, point) in [
                (Endpoint::Source, request.source),
                (Endpoint::Destination, request.destination),
            ] {
                if let Some(zone) = self.catalog.zone_containing(point) {
                    return Err(InputError::EndpointInRestrictedZone { which, zone });
                }
            }
        }
        Ok(())
    }
}

fn validate_point(point: GeoPoint, which: Endpoint) -> Result<(), InputError> {
    if !point.is_finite() {
        return Err(InputError::NonFiniteCoordinate {
            which,
            lat: point.lat,
            lon: point.lon,
        });
    }
    if !(-90.0..=90.0).contains(&point.lat) {
        return Err(InputError::LatitudeOutOfRange {
            which,
            lat: point.lat,
        });
    }
    if !(-180.0..=180.0).contains(&point.lon) {
        return Err(InputError::LongitudeOutOfRange {
            which,
            lon: point.lon,
        });
    }
    Ok(())
}

fn locate(grid: &OccupancyGrid, point: GeoPoint, which: Endpoint) -> Result<Cell> {
    grid.cell_of(point).ok_or_else(|| {
        warn!(%which, lat = point.lat, lon = point.lon, "endpoint outside planning grid");
        FeasibilityError::Input(InputError::OutOfBounds {
            which,
            lat: point.lat,
            lon: point.lon,
        })
    })
}

/// Cell corners along the path, with the ends pinned to the exact request points.
fn to_waypoints(
    grid: &OccupancyGrid,
    cells: &[Cell],
    source: GeoPoint,
    destination: GeoPoint,
) -> Vec<GeoPoint> {
    if cells.len() <= 1 {
        return if source == destination {
            vec![source]
        } else {
            vec![source, destination]
        };
    }
    let mut waypoints: Vec<GeoPoint> = cells.iter().map(|cell| grid.cell_origin(*cell)).collect();
    let last = waypoints.len() - 1;
    waypoints[0] = source;
    waypoints[last] = destination;
    waypoints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::METERS_PER_DEGREE;

    fn north_path(total_m: f64) -> Vec<GeoPoint> {
        let half = total_m / 2.0 / METERS_PER_DEGREE;
        vec![
            GeoPoint::new(23.0, 80.0),
            GeoPoint::new(23.0 + half, 80.0),
            GeoPoint::new(23.0 + 2.0 * half, 80.0),
        ]
    }

    #[test]
    fn straight_three_point_distance() {
        let assessment = evaluate(north_path(1000.0), 50.0, &EngineConfig::default());
        assert!((assessment.total_distance - 1000.0).abs() < 1e-6);
        assert_eq!(assessment.waypoints.len(), 3);
    }

    #[test]
    fn battery_margin_is_strict() {
        let config = EngineConfig::default();

        let ok = evaluate(north_path(1000.0), 21.0, &config);
        assert!((ok.required_battery - 0.2).abs() < 1e-9);
        assert!((ok.estimated_remaining_battery - 20.8).abs() < 1e-9);
        assert!(ok.feasible);

        let short = evaluate(north_path(1000.0), 20.1, &config);
        assert!(!short.feasible);
        assert!((short.estimated_remaining_battery - 19.9).abs() < 1e-9);
    }

    #[test]
    fn empty_and_single_point_paths_cost_nothing() {
        let config = EngineConfig::default();
        let single = evaluate(vec![GeoPoint::new(23.0, 80.0)], 30.0, &config);
        assert_eq!(single.total_distance, 0.0);
        assert_eq!(single.required_battery, 0.0);
        assert!(single.feasible);

        let empty = evaluate(Vec::new(), 20.0, &config);
        assert_eq!(empty.total_distance, 0.0);
        assert!(!empty.feasible, "remaining must exceed the threshold");
    }

    #[test]
    fn engine_rejects_invalid_config() {
        let config = EngineConfig {
            zones: Vec::new(),
            ..EngineConfig::default()
        };
        assert!(matches!(
            FeasibilityEngine::new(config),
            Err(FeasibilityError::Config(crate::error::ConfigError::NoZones))
        ));
    }

    #[test]
    fn request_validation_errors() {
        let engine = FeasibilityEngine::new(EngineConfig::default()).unwrap();
        let good = GeoPoint::new(23.16, 79.96);

        let request = FeasibilityRequest {
            source: GeoPoint::new(f64::NAN, 80.0),
            destination: good,
            battery: 80.0,
        };
        assert!(matches!(
            engine.check(&request),
            Err(FeasibilityError::Input(InputError::NonFiniteCoordinate {
                which: Endpoint::Source,
                ..
            }))
        ));

        let request = FeasibilityRequest {
            source: good,
            destination: GeoPoint::new(95.0, 80.0),
            battery: 80.0,
        };
        assert!(matches!(
            engine.check(&request),
            Err(FeasibilityError::Input(InputError::LatitudeOutOfRange {
                which: Endpoint::Destination,
                ..
            }))
        ));

        for battery in [-1.0, f64::NAN, 100.5] {
            let request = FeasibilityRequest {
                source: good,
                destination: good,
                battery,
            };
            assert!(matches!(
                engine.check(&request),
                Err(FeasibilityError::Input(InputError::InvalidBattery(_)))
            ));
        }
    }

    #[test]
    fn waypoints_pin_exact_endpoints() {
        let grid = OccupancyGrid::with_dimensions(GeoPoint::new(23.0, 80.0), 100.0, 5, 5, 100)
            .unwrap();
        let source = GeoPoint::new(23.00005, 80.00005);
        let destination = GeoPoint::new(23.0025, 80.0025);
        let cells = [Cell::new(0, 0), Cell::new(1, 1), Cell::new(2, 2)];
        let waypoints = to_waypoints(&grid, &cells, source, destination);
        assert_eq!(waypoints.len(), 3);
        assert_eq!(waypoints[0], source);
        assert_eq!(waypoints[1], grid.cell_origin(Cell::new(1, 1)));
        assert_eq!(waypoints[2], destination);

        assert_eq!(
            to_waypoints(&grid, &cells[..1], source, source),
            vec![source]
        );
        assert_eq!(
            to_waypoints(&grid, &cells[..1], source, destination),
            vec![source, destination]
        );
    }
}
