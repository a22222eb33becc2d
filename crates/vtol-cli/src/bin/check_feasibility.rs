//! Evaluate one flight request and print the outcome as JSON.
//!
//! Usage:
//!   cargo run -p vtol-cli --bin check_feasibility -- --scenario detour
//!   cargo run -p vtol-cli --bin check_feasibility -- \
//!       --source-lat 23.16 --source-lon 79.96 --dest-lat 23.25 --dest-lon 80.1 --battery 60
//!
//! Environment: VTOL_CONFIG, VTOL_RESOLUTION_M, VTOL_TURN_RADIUS_M,
//! VTOL_CONSUMPTION_RATE, VTOL_MIN_BATTERY, VTOL_LOG_JSON, RUST_LOG.

use anyhow::{bail, Context, Result};
use clap::builder::PossibleValuesParser;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use vtol_cli::logging::init_tracing;
use vtol_cli::{scenario_by_name, Config, SCENARIO_NAMES};
use vtol_core::{haversine_distance, EngineConfig, FeasibilityEngine, FeasibilityRequest, GeoPoint};

#[derive(Parser, Debug)]
#[command(author, version, about = "Check whether a VTOL flight is feasible")]
struct Args {
    /// Engine configuration JSON (overrides VTOL_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request JSON file with source, destination and battery
    #[arg(long, conflicts_with = "scenario")]
    request: Option<PathBuf>,

    /// Run a built-in scenario with its own configuration
    #[arg(long, value_parser = PossibleValuesParser::new(SCENARIO_NAMES))]
    scenario: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    source_lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    source_lon: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    dest_lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    dest_lon: Option<f64>,

    /// Battery state of charge in percent
    #[arg(long)]
    battery: Option<f64>,

    /// Single-line JSON output
    #[arg(long, default_value_t = false)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut env_config = Config::from_env();
    if let Some(path) = args.config.clone() {
        env_config.engine_config_path = Some(path);
    }
    init_tracing(env_config.log_json, "vtol_core=info")?;

    let (engine_config, request) = resolve(&args, &env_config)?;
    let engine = FeasibilityEngine::new(engine_config).context("building feasibility engine")?;

    let straight_m = haversine_distance(
        request.source.lat,
        request.source.lon,
        request.destination.lat,
        request.destination.lon,
    );
    info!(straight_m, zones = engine.catalog().len(), "checking request");

    let outcome = engine.check(&request)?;
    let json = if args.compact {
        serde_json::to_string(&outcome)?
    } else {
        serde_json::to_string_pretty(&outcome)?
    };
    println!("{json}");
    eprintln!("straight-line distance: {:.1} m", straight_m);
    Ok(())
}

fn resolve(args: &Args, env_config: &Config) -> Result<(EngineConfig, FeasibilityRequest)> {
    if let Some(name) = &args.scenario {
        let scenario = scenario_by_name(name).with_context(|| format!("unknown scenario {name}"))?;
        info!(scenario = scenario.name, "{}", scenario.description);
        let mut request = scenario.request;
        if let Some(battery) = args.battery {
            request.battery = battery;
        }
        return Ok((env_config.apply_overrides(scenario.config), request));
    }

    let engine_config = env_config.engine_config()?;
    if let Some(path) = &args.request {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading request {}", path.display()))?;
        let request: FeasibilityRequest = serde_json::from_str(&raw)
            .with_context(|| format!("parsing request {}", path.display()))?;
        return Ok((engine_config, request));
    }

    let (Some(source_lat), Some(source_lon), Some(dest_lat), Some(dest_lon), Some(battery)) = (
        args.source_lat,
        args.source_lon,
        args.dest_lat,
        args.dest_lon,
        args.battery,
    ) else {
        bail!("pass --scenario, --request, or all of --source-lat/--source-lon/--dest-lat/--dest-lon/--battery");
    };
    Ok((
        engine_config,
        FeasibilityRequest {
            source: GeoPoint::new(source_lat, source_lon),
            destination: GeoPoint::new(dest_lat, dest_lon),
            battery,
        },
    ))
}
