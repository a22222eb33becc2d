//! Fire many random feasibility checks at one shared engine.
//!
//! Usage:
//!   cargo run -p vtol-cli --release --bin feasibility_stress -- --count 200 --seed 7

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{info, warn};
use vtol_cli::logging::init_tracing;
use vtol_cli::stress::{classify, random_request, Tally};
use vtol_cli::Config;
use vtol_core::{FeasibilityEngine, FeasibilityRequest};

#[derive(Parser, Debug)]
#[command(author, version, about = "Concurrent load run for the feasibility engine")]
struct Args {
    /// Number of requests
    #[arg(long, default_value_t = 100)]
    count: usize,

    /// RNG seed for reproducible runs
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Fraction of the zone bounding box to extend the sampling area by
    #[arg(long, default_value_t = 0.1)]
    spread: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env_config = Config::from_env();
    init_tracing(env_config.log_json, "vtol_core=warn")?;

    let engine = Arc::new(
        FeasibilityEngine::new(env_config.engine_config()?).context("building feasibility engine")?,
    );
    let bounds = engine.catalog().bounds(engine.config().grid_margin_m);
    let mut rng = StdRng::seed_from_u64(args.seed);

    let started = Instant::now();
    let mut tasks = JoinSet::new();
    for id in 0..args.count {
        let request = random_request(&mut rng, bounds, args.spread);
        let engine = Arc::clone(&engine);
        tasks.spawn_blocking(move || {
            let begin = Instant::now();
            let result = engine.check(&request);
            (id, request, result, begin.elapsed())
        });
    }

    let mut tally = Tally::default();
    let mut slowest: Option<(usize, FeasibilityRequest, Duration)> = None;
    while let Some(joined) = tasks.join_next().await {
        let (id, request, result, elapsed) = match joined {
            Ok(done) => done,
            Err(err) => {
                warn!(error = %err, "stress task failed");
                continue;
            }
        };
        let class = classify(&result);
        if let Err(err) = &result {
            info!(id, %class, error = %err, "request not evaluated");
        }
        tally.record(class);
        if slowest.as_ref().map_or(true, |(_, _, worst)| elapsed > *worst) {
            slowest = Some((id, request, elapsed));
        }
    }

    println!(
        "\n=== {} requests in {:.2?} (seed {}) ===",
        tally.total(),
        started.elapsed(),
        args.seed
    );
    for (class, count) in tally.iter() {
        println!("{:<14} {}", class.to_string(), count);
    }
    if let Some((id, request, elapsed)) = slowest {
        println!(
            "Slowest: #{} in {:.2?} ({:.5},{:.5}) -> ({:.5},{:.5})",
            id,
            elapsed,
            request.source.lat,
            request.source.lon,
            request.destination.lat,
            request.destination.lon
        );
    }
    Ok(())
}
